// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Log tailing for pods backing a workload.
//!
//! A tail has no success signal of its own: it streams until cancelled or the
//! backend fails, so it only ever loses a race against the primary waiter.

use crate::error::Result;
use crate::wait::Worker;
use async_trait::async_trait;
use futures::{AsyncBufReadExt, StreamExt, TryStreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::api::LogParams;
use kube::{Api, Client, ResourceExt};
use kube_runtime::watcher;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Streams logs for pods matching a selector until cancelled
#[async_trait]
pub trait LogBackend: Send + Sync {
    async fn tail(&self, cancel: &CancellationToken, namespace: &str, selector: &str)
        -> Result<()>;
}

/// Log backend following container logs of live cluster pods
pub struct PodLogs {
    client: Client,
    timestamps: bool,
    since_seconds: Option<i64>,
}

impl PodLogs {
    pub fn new(client: Client) -> Self {
        PodLogs {
            client,
            timestamps: false,
            since_seconds: Some(60),
        }
    }

    pub fn timestamps(mut self, enable: bool) -> Self {
        self.timestamps = enable;
        self
    }

    pub fn since_seconds(mut self, since: Option<i64>) -> Self {
        self.since_seconds = since;
        self
    }
}

#[async_trait]
impl LogBackend for PodLogs {
    async fn tail(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        selector: &str,
    ) -> Result<()> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let events = watcher(pods.clone(), watcher::Config::default().labels(selector));
        tokio::pin!(events);

        let mut tails: JoinSet<()> = JoinSet::new();
        let mut active: HashSet<String> = HashSet::new();

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = events.next() => event,
            };
            match event {
                Some(Ok(watcher::Event::Apply(pod) | watcher::Event::InitApply(pod))) => {
                    let name = pod.name_any();
                    if active.contains(&name) || !is_running(&pod) {
                        continue;
                    }
                    debug!("tailing pod {}", name);
                    active.insert(name.clone());
                    for container in container_names(&pod) {
                        tails.spawn(follow_container(
                            pods.clone(),
                            name.clone(),
                            container,
                            LogParams {
                                follow: true,
                                timestamps: self.timestamps,
                                since_seconds: self.since_seconds,
                                ..Default::default()
                            },
                            cancel.clone(),
                        ));
                    }
                }
                Some(Ok(watcher::Event::Delete(pod))) => {
                    active.remove(&pod.name_any());
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    // the watcher re-establishes itself; nothing to do here
                    warn!("pod watch error: {}", err);
                }
                None => break,
            }
        }

        tails.shutdown().await;
        Ok(())
    }
}

async fn follow_container(
    pods: Api<Pod>,
    pod: String,
    container: String,
    mut params: LogParams,
    cancel: CancellationToken,
) {
    params.container = Some(container.clone());
    let reader = match pods.log_stream(&pod, &params).await {
        Ok(reader) => reader,
        Err(err) => {
            warn!("failed to open log stream for {}/{}: {}", pod, container, err);
            return;
        }
    };
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            line = lines.try_next() => line,
        };
        match line {
            Ok(Some(line)) => println!("[{}/{}] {}", pod, container, line),
            Ok(None) => return,
            Err(err) => {
                debug!("log stream for {}/{} ended: {}", pod, container, err);
                return;
            }
        }
    }
}

fn is_running(pod: &Pod) -> bool {
    pod.status.as_ref().and_then(|s| s.phase.as_deref()) == Some("Running")
}

fn container_names(pod: &Pod) -> Vec<String> {
    pod.spec
        .as_ref()
        .map(|spec| spec.containers.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}

/// Package a log tail as a race worker
pub fn tail_worker(
    backend: Arc<dyn LogBackend>,
    namespace: impl Into<String>,
    selector: impl Into<String>,
) -> Worker {
    let namespace = namespace.into();
    let selector = selector.into();
    Worker::new(move |cancel| async move { backend.tail(&cancel, &namespace, &selector).await })
}
