// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! First-result-wins execution of concurrent wait workers.

use crate::error::{Result, VigilError};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A cancellable unit of concurrent work.
///
/// The worker owns every resource it opens and must return promptly once the
/// token it was started with is cancelled.
pub struct Worker {
    run: Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, Result<()>> + Send>,
}

impl Worker {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Worker {
            run: Box::new(move |cancel| f(cancel).boxed()),
        }
    }
}

/// Run `workers` concurrently until the first one returns, the `timeout`
/// elapses, or `cancel` fires, whichever happens first.
///
/// The first terminal result wins and later ones are discarded. Before
/// returning, the shared token is cancelled and every spawned worker is
/// drained, so no background activity outlives the call.
pub async fn race(
    cancel: &CancellationToken,
    timeout: Duration,
    workers: Vec<Worker>,
) -> Result<()> {
    let shared = cancel.child_token();
    let mut tasks = JoinSet::new();
    for worker in workers {
        tasks.spawn((worker.run)(shared.clone()));
    }

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let first = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break Err(VigilError::Canceled),
            _ = &mut deadline => break Err(VigilError::Timeout(timeout)),
            joined = tasks.join_next(), if !tasks.is_empty() => match joined {
                Some(Ok(result)) => break result,
                Some(Err(err)) => break Err(VigilError::Worker(err.into())),
                None => continue,
            },
        }
    };

    shared.cancel();
    let mut stragglers = 0;
    while tasks.join_next().await.is_some() {
        stragglers += 1;
    }
    if stragglers > 0 {
        debug!("drained {} remaining wait workers", stragglers);
    }
    first
}
