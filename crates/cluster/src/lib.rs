//! Cluster access for binding enumeration.
//!
//! Holds the paging abstraction the find pipeline consumes and the
//! kube-backed implementation that talks to a live API server.

use std::path::Path;
use thiserror::Error;

pub mod kube_source;

pub use kube_source::KubeBindingSource;

/// Page size used when listing bindings from the API server.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to load kubeconfig {path}: {source}")]
    Kubeconfig {
        path: String,
        #[source]
        source: kube::config::KubeconfigError,
    },
    #[error("failed to infer Kubernetes configuration: {0}")]
    Infer(#[from] kube::config::InferConfigError),
    #[error("failed to initialize Kubernetes client: {0}")]
    Client(#[source] kube::Error),
    #[error("failed to list {kind}: {source}")]
    List {
        kind: &'static str,
        #[source]
        source: kube::Error,
    },
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct BindingPage<B> {
    pub items: Vec<B>,
    /// Opaque token for the next page; `None` once the listing is exhausted.
    pub continue_token: Option<String>,
}

#[async_trait::async_trait]
pub trait BindingSource<B: Send>: Send + Sync {
    /// Kind name of the listed objects, used in logs and errors.
    fn kind(&self) -> &'static str;

    async fn list_page(
        &self,
        continue_token: Option<&str>,
        limit: u32,
    ) -> Result<BindingPage<B>, ClusterError>;
}

/// Builds a client from an explicit kubeconfig file, or from the standard
/// inference chain (`KUBECONFIG`, `~/.kube/config`, in-cluster) when absent.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<kube::Client, ClusterError> {
    let config = match kubeconfig {
        Some(path) => {
            let display = path.display().to_string();
            let raw = kube::config::Kubeconfig::read_from(path).map_err(|source| {
                ClusterError::Kubeconfig {
                    path: display.clone(),
                    source,
                }
            })?;
            kube::Config::from_custom_kubeconfig(raw, &kube::config::KubeConfigOptions::default())
                .await
                .map_err(|source| ClusterError::Kubeconfig {
                    path: display,
                    source,
                })?
        }
        None => kube::Config::infer().await?,
    };
    tracing::debug!(cluster_url = %config.cluster_url, "connecting to cluster");
    kube::Client::try_from(config).map_err(ClusterError::Client)
}
