// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Object store seam over the Kubernetes API.
//!
//! The waiters only need two primitives from the cluster: fetch one object by
//! key, and open a watch stream for it. Putting those behind a trait keeps the
//! wait subsystem testable against scripted stores.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{WatchEvent, WatchParams};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fmt::Debug;

/// Namespace and name identifying a watched object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ObjectKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// One observed change on a watch stream
#[derive(Debug, Clone)]
pub enum StoreEvent<K> {
    /// The object was added or modified
    Applied(K),
    /// The object was deleted; carries the last observed version
    Deleted(K),
    /// Cursor checkpoint without an object change
    Bookmark(String),
}

/// A watch stream; may yield an error and terminate at any time
pub type WatchStream<K> = BoxStream<'static, kube::Result<StoreEvent<K>>>;

/// Typed get/watch access to stored objects
#[async_trait]
pub trait ObjectStore<K: 'static>: Send + Sync {
    async fn get(&self, key: &ObjectKey) -> kube::Result<K>;

    /// Open a watch stream for `key`, resuming from `cursor` when given.
    /// Opening must not fail just because the object does not exist yet.
    async fn watch(&self, key: &ObjectKey, cursor: Option<&str>) -> kube::Result<WatchStream<K>>;
}

/// Object store backed by a live cluster connection
#[derive(Clone)]
pub struct ClusterStore {
    client: Client,
}

impl ClusterStore {
    pub fn new(client: Client) -> Self {
        ClusterStore { client }
    }
}

#[async_trait]
impl<K> ObjectStore<K> for ClusterStore
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + 'static,
{
    async fn get(&self, key: &ObjectKey) -> kube::Result<K> {
        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        api.get(&key.name).await
    }

    async fn watch(&self, key: &ObjectKey, cursor: Option<&str>) -> kube::Result<WatchStream<K>> {
        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        // watch the namespace scoped to the name, so a not-yet-created
        // object still gets a valid (idle) session
        let wp = WatchParams::default().fields(&format!("metadata.name={}", key.name));
        let events = api.watch(&wp, cursor.unwrap_or("0")).await?;
        Ok(events
            .map(|event| match event {
                Ok(WatchEvent::Added(obj)) | Ok(WatchEvent::Modified(obj)) => {
                    Ok(StoreEvent::Applied(obj))
                }
                Ok(WatchEvent::Deleted(obj)) => Ok(StoreEvent::Deleted(obj)),
                Ok(WatchEvent::Bookmark(bm)) => Ok(StoreEvent::Bookmark(bm.metadata.resource_version)),
                Ok(WatchEvent::Error(resp)) => Err(kube::Error::Api(resp)),
                Err(err) => Err(err),
            })
            .boxed())
    }
}
