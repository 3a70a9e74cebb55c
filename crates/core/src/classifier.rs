//! Recognizes subjects federated through Identity Service for GKE.
//!
//! Recognition is purely string-based: the broker encodes the organization's
//! domain and naming convention in the subject name itself.

use crate::rules::{RuleSet, RBAC_API_GROUP, SYSTEM_PREFIX};
use k8s_openapi::api::rbac::v1::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Federated user with its local name.
    User(&'a str),
    /// Federated group with its local name.
    Group(&'a str),
    Unrecognized,
}

/// Returns the local name of a federated user, or `None` if the subject is
/// not one. The include prefix is stripped; the include suffix is kept.
pub fn federated_user<'a>(subject: &'a Subject, rules: &RuleSet) -> Option<&'a str> {
    let name = eligible_name(subject, "User")?;
    if !name.ends_with(rules.user_include_suffix.as_str()) {
        return None;
    }
    name.strip_prefix(rules.user_include_prefix.as_str())
}

/// Returns the local name of a federated group, or `None` if the subject is
/// not one.
///
/// An empty exclude suffix matches every name, so no group is recognized
/// until one is configured.
pub fn federated_group<'a>(subject: &'a Subject, rules: &RuleSet) -> Option<&'a str> {
    let name = eligible_name(subject, "Group")?;
    if name.ends_with(rules.groups_exclude_suffix.as_str()) {
        return None;
    }
    name.strip_prefix(rules.groups_include_prefix.as_str())
}

pub fn classify<'a>(subject: &'a Subject, rules: &RuleSet) -> Classification<'a> {
    if let Some(local) = federated_user(subject, rules) {
        Classification::User(local)
    } else if let Some(local) = federated_group(subject, rules) {
        Classification::Group(local)
    } else {
        Classification::Unrecognized
    }
}

pub fn is_federated(subject: &Subject, rules: &RuleSet) -> bool {
    !matches!(classify(subject, rules), Classification::Unrecognized)
}

fn eligible_name<'a>(subject: &'a Subject, kind: &str) -> Option<&'a str> {
    if subject.api_group.as_deref() != Some(RBAC_API_GROUP) || subject.kind != kind {
        return None;
    }
    let name = subject.name.as_str();
    (!name.starts_with(SYSTEM_PREFIX)).then_some(name)
}
