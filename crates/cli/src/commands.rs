use crate::registry::{CommandHandler, Invocation};
use anyhow::Context;
use cluster::{BindingSource, KubeBindingSource};
use migrator_core::binding::RbacBinding;
use migrator_core::pipeline;
use migrator_core::rules::Mode;
use std::marker::PhantomData;
use std::path::Path;
use tracing::info;

/// Lists bindings of kind `B` from the cluster and prints those referring to
/// federated identities.
pub struct FindCommand<B> {
    name: &'static str,
    synopsis: &'static str,
    _kind: PhantomData<fn() -> B>,
}

impl<B> FindCommand<B> {
    pub fn new(name: &'static str, synopsis: &'static str) -> Self {
        Self {
            name,
            synopsis,
            _kind: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<B> CommandHandler for FindCommand<B>
where
    B: RbacBinding,
    KubeBindingSource<B>: BindingSource<B>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn synopsis(&self) -> &'static str {
        self.synopsis
    }

    async fn execute(&self, invocation: Invocation<'_>) -> anyhow::Result<()> {
        let cfg = invocation.config;
        cfg.rules
            .validate(Mode::Find, cfg.require_groups_exclude_suffix)?;

        let client = cluster::connect(cfg.kubeconfig.as_deref().map(Path::new))
            .await
            .context("connecting to cluster")?;
        info!(command = self.name, "listing {}s", B::KIND);

        let source = KubeBindingSource::<B>::new(client);
        pipeline::find_and_write(
            &source,
            &cfg.rules,
            cfg.page_size,
            invocation.output,
            invocation.format,
        )
        .await?;
        Ok(())
    }
}

/// Reads a list of `B` found earlier and prints migrated copies.
pub struct RewriteCommand<B> {
    name: &'static str,
    synopsis: &'static str,
    _kind: PhantomData<fn() -> B>,
}

impl<B> RewriteCommand<B> {
    pub fn new(name: &'static str, synopsis: &'static str) -> Self {
        Self {
            name,
            synopsis,
            _kind: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<B: RbacBinding> CommandHandler for RewriteCommand<B> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn synopsis(&self) -> &'static str {
        self.synopsis
    }

    async fn execute(&self, invocation: Invocation<'_>) -> anyhow::Result<()> {
        let cfg = invocation.config;
        cfg.rules
            .validate(Mode::Rewrite, cfg.require_groups_exclude_suffix)?;

        info!(
            command = self.name,
            pool = %cfg.rules.workforce_pool_name,
            "rewriting {}",
            B::LIST_KIND
        );
        pipeline::rewrite::<B, _, _>(
            invocation.input,
            invocation.output,
            &cfg.rules,
            invocation.format,
        )?;
        Ok(())
    }
}
