// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to become ready: {0}")]
    ConditionFailed(String),

    #[error("wait canceled")]
    Canceled,

    #[error("worker failed: {0}")]
    Worker(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VigilError>;

/// Check if a kube error is a NotFound API response
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

/// Check if a kube error invalidates the watch resume cursor
pub fn is_stale_cursor(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 410)
}

/// Check if a watch error is worth retrying with backoff.
/// Client-side API rejections (permission denied, malformed request) are not;
/// transport failures, server errors, throttling and stale cursors are.
pub fn is_transient_watch(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(resp) => {
            matches!(resp.code, 404 | 408 | 410 | 429) || resp.code >= 500
        }
        _ => true,
    }
}
