use crate::{BindingPage, BindingSource, ClusterError};
use kube::api::{Api, ListParams};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Lists bindings of kind `B` across the whole cluster.
///
/// Namespaced kinds are listed across all namespaces.
pub struct KubeBindingSource<B> {
    client: kube::Client,
    _kind: PhantomData<fn() -> B>,
}

impl<B> KubeBindingSource<B> {
    pub fn new(client: kube::Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<B> BindingSource<B> for KubeBindingSource<B>
where
    B: k8s_openapi::Resource
        + kube::Resource<DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
{
    fn kind(&self) -> &'static str {
        <B as k8s_openapi::Resource>::KIND
    }

    async fn list_page(
        &self,
        continue_token: Option<&str>,
        limit: u32,
    ) -> Result<BindingPage<B>, ClusterError> {
        let api: Api<B> = Api::all(self.client.clone());
        let mut params = ListParams::default().limit(limit);
        if let Some(token) = continue_token {
            params = params.continue_token(token);
        }
        let list = api.list(&params).await.map_err(|source| ClusterError::List {
            kind: <B as k8s_openapi::Resource>::KIND,
            source,
        })?;
        Ok(BindingPage {
            items: list.items,
            continue_token: list.metadata.continue_.filter(|t| !t.is_empty()),
        })
    }
}
