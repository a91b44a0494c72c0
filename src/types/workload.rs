// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::wait::Readiness;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Condition type reporting overall workload health
pub const READY_CONDITION: &str = "Ready";

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "apps.vigil.dev", version = "v1alpha1", kind = "Workload")]
#[kube(namespaced)]
#[kube(status = "WorkloadStatus")]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<WorkloadSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Workload {
    /// Evaluate the Ready condition of the last observed version.
    ///
    /// A stale status (observedGeneration behind metadata.generation) is never
    /// trusted. Ready=False is terminal and carries the controller's own
    /// message; anything else means keep waiting.
    pub fn readiness(&self) -> Readiness {
        let status = match &self.status {
            Some(status) => status,
            None => return Readiness::Pending,
        };
        if self.metadata.generation != status.observed_generation {
            return Readiness::Pending;
        }
        for cond in status.conditions.iter().flatten() {
            if cond.condition_type == READY_CONDITION {
                match cond.status.as_str() {
                    "True" => return Readiness::Ready,
                    "False" => {
                        return Readiness::Failed {
                            message: cond.message.clone().unwrap_or_default(),
                        }
                    }
                    _ => return Readiness::Pending,
                }
            }
        }
        Readiness::Pending
    }
}

/// Condition function for waiting on workload readiness
pub fn workload_ready(workload: &Workload) -> Readiness {
    workload.readiness()
}
