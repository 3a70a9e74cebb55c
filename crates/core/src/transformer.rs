use crate::classifier::{classify, Classification};
use crate::rules::{RuleSet, RBAC_API_GROUP};
use k8s_openapi::api::rbac::v1::Subject;

const WORKFORCE_POOLS: &str = "//iam.googleapis.com/locations/global/workforcePools";

/// Principal identifier for a single workforce pool subject.
pub fn principal(pool: &str, subject: &str) -> String {
    format!("principal:{WORKFORCE_POOLS}/{pool}/subject/{subject}")
}

/// Principal set identifier for a workforce pool group.
pub fn principal_set(pool: &str, group: &str) -> String {
    format!("principalSet:{WORKFORCE_POOLS}/{pool}/group/{group}")
}

/// Maps a subject onto its Workforce Identity Federation counterpart.
///
/// Subjects that are not federated users or groups are returned unchanged.
/// Local names are used verbatim.
pub fn migrate_subject(subject: &Subject, rules: &RuleSet) -> Subject {
    match classify(subject, rules) {
        Classification::User(local) => {
            rbac_subject("User", principal(&rules.workforce_pool_name, local))
        }
        Classification::Group(local) => {
            rbac_subject("Group", principal_set(&rules.workforce_pool_name, local))
        }
        Classification::Unrecognized => subject.clone(),
    }
}

fn rbac_subject(kind: &str, name: String) -> Subject {
    Subject {
        api_group: Some(RBAC_API_GROUP.to_string()),
        kind: kind.to_string(),
        name,
        namespace: None,
    }
}
