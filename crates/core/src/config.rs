use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};

/// Settings shared by all commands. Command-line flags are applied on top of
/// what is loaded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Kubeconfig used by the find commands; inferred when unset.
    pub kubeconfig: Option<String>,
    pub page_size: u32,
    /// Reject an empty `groups_exclude_suffix` instead of excluding every group.
    pub require_groups_exclude_suffix: bool,
    pub rules: RuleSet,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            page_size: cluster::DEFAULT_PAGE_SIZE,
            require_groups_exclude_suffix: false,
            rules: RuleSet::default(),
        }
    }
}

/// Loads settings from an optional file, overridden by `MIGRATOR_*`
/// environment variables (`__` separates nested keys, e.g.
/// `MIGRATOR_RULES__USER_INCLUDE_SUFFIX`).
pub fn load(path: Option<&str>) -> anyhow::Result<MigratorConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("MIGRATOR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
