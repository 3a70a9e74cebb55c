//! Produces migrated copies of bindings.
//!
//! Each output is a fresh object: cluster-assigned identity is stripped and
//! the name is suffixed, so applying it creates a new binding next to the
//! original instead of updating it.

use crate::binding::RbacBinding;
use crate::rules::RuleSet;
use crate::transformer::migrate_subject;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::Metadata;

pub const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Appended to the name of every rewritten binding.
pub const MIGRATED_NAME_SUFFIX: &str = "-wfidf";

/// Clears fields owned by the API server and by `kubectl apply`.
pub fn sanitize_metadata(meta: &mut ObjectMeta) {
    if let Some(annotations) = meta.annotations.as_mut() {
        annotations.remove(LAST_APPLIED_ANNOTATION);
        if annotations.is_empty() {
            meta.annotations = None;
        }
    }
    meta.creation_timestamp = None;
    meta.managed_fields = None;
    meta.resource_version = None;
    meta.uid = None;
}

pub fn migrated_name(name: &str) -> String {
    format!("{name}{MIGRATED_NAME_SUFFIX}")
}

/// Returns a sanitized, renamed copy of `input` with every subject migrated.
/// `input` is left untouched.
pub fn rewrite_binding<B: RbacBinding>(input: &B, rules: &RuleSet) -> B {
    let mut out = input.clone();
    let meta = out.metadata_mut();
    sanitize_metadata(meta);
    meta.name = Some(migrated_name(input.name()));

    let subjects = input
        .subjects()
        .map(|subjects| subjects.iter().map(|s| migrate_subject(s, rules)).collect());
    out.set_subjects(subjects);
    out
}

pub fn rewrite_all<B: RbacBinding>(input: &[B], rules: &RuleSet) -> Vec<B> {
    input.iter().map(|b| rewrite_binding(b, rules)).collect()
}
