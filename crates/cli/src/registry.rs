//! Explicit table of the commands this binary can run.
//!
//! Built once in `main` and handed to dispatch; nothing registers itself.

use crate::commands::{FindCommand, RewriteCommand};
use anyhow::anyhow;
use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleBinding};
use migrator_core::config::MigratorConfig;
use migrator_core::manifest::OutputFormat;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::sync::Arc;

/// Everything a command needs for one run.
pub struct Invocation<'a> {
    pub config: &'a MigratorConfig,
    pub format: OutputFormat,
    pub input: Box<dyn Read + Send + 'a>,
    pub output: &'a mut (dyn Write + Send),
}

#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn synopsis(&self) -> &'static str;

    async fn execute(&self, invocation: Invocation<'_>) -> anyhow::Result<()>;
}

#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.commands.insert(handler.name(), handler);
        self
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Arc<dyn CommandHandler>> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown command: {name}"))
    }

    /// Registered commands with their synopses, sorted by name.
    pub fn list(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.commands.values().map(|c| (c.name(), c.synopsis()))
    }
}

/// The find/rewrite pair for each binding kind.
pub fn builtin() -> CommandRegistry {
    CommandRegistry::new()
        .with_command(Arc::new(FindCommand::<ClusterRoleBinding>::new(
            "find-clusterrolebindings",
            "Finds all ClusterRoleBinding objects in the cluster that appear to refer to federated users or groups",
        )))
        .with_command(Arc::new(FindCommand::<RoleBinding>::new(
            "find-rolebindings",
            "Finds all RoleBinding objects in the cluster that appear to refer to federated users or groups",
        )))
        .with_command(Arc::new(RewriteCommand::<ClusterRoleBinding>::new(
            "rewrite-clusterrolebindings",
            "Reads a ClusterRoleBindingList and outputs a migrated copy",
        )))
        .with_command(Arc::new(RewriteCommand::<RoleBinding>::new(
            "rewrite-rolebindings",
            "Reads a RoleBindingList and outputs a migrated copy",
        )))
}
