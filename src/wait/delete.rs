// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull-based waiting for an object to disappear.
//!
//! The simpler sibling of the condition watch, for resources without a
//! reliable deletion event: poll until the store reports NotFound.

use crate::backoff::Backoff;
use crate::error::{is_not_found, Result, VigilError};
use crate::store::{ObjectKey, ObjectStore};
use crate::wait::Worker;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Poll `key` until the store reports it gone.
///
/// Only NotFound terminates successfully; any other get error surfaces
/// immediately. Polls are spaced by `backoff`, and cancellation is honored
/// during both the get and the sleep.
pub async fn until_delete<K, S>(
    cancel: &CancellationToken,
    store: &S,
    key: &ObjectKey,
    backoff: &dyn Backoff,
) -> Result<()>
where
    K: Send + 'static,
    S: ObjectStore<K>,
{
    let mut attempt: u32 = 0;
    loop {
        let found = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(VigilError::Canceled),
            found = store.get(key) => found,
        };
        match found {
            Ok(_) => {}
            Err(err) if is_not_found(&err) => {
                debug!("{} is gone", key);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(VigilError::Canceled),
            _ = tokio::time::sleep(backoff.delay(attempt)) => {}
        }
        attempt += 1;
    }
}

/// Package a deletion wait as a race worker
pub fn delete_worker<K, S>(store: Arc<S>, key: ObjectKey, backoff: Arc<dyn Backoff>) -> Worker
where
    K: Send + 'static,
    S: ObjectStore<K> + 'static,
{
    Worker::new(move |cancel| async move {
        until_delete(&cancel, store.as_ref(), &key, backoff.as_ref()).await
    })
}
