// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Push-based waiting on a status condition, over a reconnecting watch.

use crate::backoff::Backoff;
use crate::error::{is_stale_cursor, is_transient_watch, Result, VigilError};
use crate::store::{ObjectKey, ObjectStore, StoreEvent, WatchStream};
use crate::wait::Worker;
use futures::StreamExt;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Result of evaluating a condition against one observed object version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Not there yet, keep watching
    Pending,
    /// The wait succeeded
    Ready,
    /// The resource itself reported failure; ends the wait immediately
    Failed { message: String },
}

/// Watch session lifecycle. Each `Streaming` session owns one open stream;
/// `Backoff` spaces reconnect attempts after a stream error or close.
enum Session<K> {
    Connecting,
    Streaming(WatchStream<K>),
    Backoff(u32),
}

/// Watch `key` until `condition` reports a terminal result.
///
/// Transient stream errors reconnect from the last delivered resourceVersion
/// after a backoff delay; the attempt counter resets on every delivered
/// event. There is no attempt cap: the caller's race timeout is the only
/// bound, which keeps retry policy and deadline policy orthogonal.
pub async fn until_condition<K, S, C>(
    cancel: &CancellationToken,
    store: &S,
    key: &ObjectKey,
    condition: C,
    backoff: &dyn Backoff,
) -> Result<()>
where
    K: Resource + Send + 'static,
    S: ObjectStore<K>,
    C: Fn(&K) -> Readiness,
{
    let mut attempt: u32 = 0;
    let mut cursor: Option<String> = None;
    let mut session: Session<K> = Session::Connecting;

    loop {
        session = match session {
            Session::Connecting => {
                let opened = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(VigilError::Canceled),
                    opened = store.watch(key, cursor.as_deref()) => opened,
                };
                match opened {
                    Ok(stream) => {
                        debug!("watching {}", key);
                        Session::Streaming(stream)
                    }
                    Err(err) if is_transient_watch(&err) => {
                        if is_stale_cursor(&err) {
                            cursor = None;
                        }
                        warn!("failed to open watch for {}: {}", key, err);
                        Session::Backoff(attempt)
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Session::Streaming(mut stream) => {
                let item = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(VigilError::Canceled),
                    item = stream.next() => item,
                };
                match item {
                    Some(Ok(event)) => {
                        attempt = 0;
                        match event {
                            StoreEvent::Applied(obj) | StoreEvent::Deleted(obj) => {
                                if let Some(version) = obj.resource_version() {
                                    cursor = Some(version);
                                }
                                let matches = obj.name_any() == key.name
                                    && obj.namespace().as_deref() == Some(key.namespace.as_str());
                                if matches {
                                    match condition(&obj) {
                                        Readiness::Ready => return Ok(()),
                                        Readiness::Failed { message } => {
                                            return Err(VigilError::ConditionFailed(message))
                                        }
                                        Readiness::Pending => {}
                                    }
                                }
                                Session::Streaming(stream)
                            }
                            StoreEvent::Bookmark(version) => {
                                cursor = Some(version);
                                Session::Streaming(stream)
                            }
                        }
                    }
                    Some(Err(err)) if is_transient_watch(&err) => {
                        if is_stale_cursor(&err) {
                            cursor = None;
                        }
                        warn!("watch for {} errored: {}", key, err);
                        Session::Backoff(attempt)
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => {
                        debug!("watch for {} closed", key);
                        Session::Backoff(attempt)
                    }
                }
            }
            Session::Backoff(n) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(VigilError::Canceled),
                    _ = tokio::time::sleep(backoff.delay(n)) => {}
                }
                attempt = n + 1;
                Session::Connecting
            }
        };
    }
}

/// Package a condition wait as a race worker
pub fn condition_worker<K, S, C>(
    store: Arc<S>,
    key: ObjectKey,
    condition: C,
    backoff: Arc<dyn Backoff>,
) -> Worker
where
    K: Resource + Send + 'static,
    S: ObjectStore<K> + 'static,
    C: Fn(&K) -> Readiness + Send + 'static,
{
    Worker::new(move |cancel| async move {
        until_condition(&cancel, store.as_ref(), &key, condition, backoff.as_ref()).await
    })
}
