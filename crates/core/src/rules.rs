use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API group every eligible subject must carry.
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// Reserved prefix of built-in Kubernetes identities; never reclassified.
pub const SYSTEM_PREFIX: &str = "system:";

/// Prefix/suffix rules recognizing federated identities, plus the pool that
/// migrated identities are rewritten to reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub user_include_prefix: String,
    pub user_include_suffix: String,
    pub groups_include_prefix: String,
    pub groups_exclude_suffix: String,
    pub workforce_pool_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Find,
    Rewrite,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("--{0} must be specified")]
    Missing(&'static str),
    #[error("--groups-exclude-suffix must be specified when --require-groups-exclude-suffix is set; an empty suffix excludes every group")]
    EmptyGroupsExcludeSuffix,
}

impl RuleSet {
    /// Checks the settings a command needs before it touches any input.
    ///
    /// An empty exclude suffix is only rejected when `strict_groups` is set;
    /// otherwise it is accepted and every group stays unrecognized.
    pub fn validate(&self, mode: Mode, strict_groups: bool) -> Result<(), SettingsError> {
        if self.user_include_suffix.is_empty() {
            return Err(SettingsError::Missing("user-include-suffix"));
        }
        if mode == Mode::Rewrite && self.workforce_pool_name.is_empty() {
            return Err(SettingsError::Missing("workforce-pool-name"));
        }
        if self.groups_exclude_suffix.is_empty() {
            if strict_groups {
                return Err(SettingsError::EmptyGroupsExcludeSuffix);
            }
            tracing::warn!(
                "--groups-exclude-suffix is empty; no group subjects will be recognized as federated"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleSet {
        RuleSet {
            user_include_suffix: "@example.com".into(),
            groups_exclude_suffix: "@groups.example.com".into(),
            ..RuleSet::default()
        }
    }

    #[test]
    fn user_suffix_is_required() {
        let r = RuleSet::default();
        assert_eq!(
            r.validate(Mode::Find, false),
            Err(SettingsError::Missing("user-include-suffix"))
        );
    }

    #[test]
    fn rewrite_requires_pool_name() {
        assert_eq!(
            rules().validate(Mode::Rewrite, false),
            Err(SettingsError::Missing("workforce-pool-name"))
        );
        assert!(rules().validate(Mode::Find, false).is_ok());

        let with_pool = RuleSet {
            workforce_pool_name: "my-pool".into(),
            ..rules()
        };
        assert!(with_pool.validate(Mode::Rewrite, false).is_ok());
    }

    #[test]
    fn empty_exclude_suffix_only_rejected_when_strict() {
        let r = RuleSet {
            groups_exclude_suffix: String::new(),
            ..rules()
        };
        assert!(r.validate(Mode::Find, false).is_ok());
        assert_eq!(
            r.validate(Mode::Find, true),
            Err(SettingsError::EmptyGroupsExcludeSuffix)
        );
    }
}
