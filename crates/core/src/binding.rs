//! Common view over the two RBAC binding kinds.

use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleBinding, Subject};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::{ListableResource, Metadata, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A `ClusterRoleBinding` or `RoleBinding`. Both carry metadata and an
/// optional ordered subject list; they differ only in scope.
pub trait RbacBinding:
    Resource
    + ListableResource
    + Metadata<Ty = ObjectMeta>
    + Clone
    + std::fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    fn subjects(&self) -> Option<&[Subject]>;

    fn set_subjects(&mut self, subjects: Option<Vec<Subject>>);

    fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }
}

impl RbacBinding for ClusterRoleBinding {
    fn subjects(&self) -> Option<&[Subject]> {
        self.subjects.as_deref()
    }

    fn set_subjects(&mut self, subjects: Option<Vec<Subject>>) {
        self.subjects = subjects;
    }
}

impl RbacBinding for RoleBinding {
    fn subjects(&self) -> Option<&[Subject]> {
        self.subjects.as_deref()
    }

    fn set_subjects(&mut self, subjects: Option<Vec<Subject>>) {
        self.subjects = subjects;
    }
}
