// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use flotilla_core::{IngressConfig, JobId, Queue, ServiceConfig};
use k8s_openapi::api::core::v1::PodSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One job within a submit request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSubmitItem {
    /// Idempotency key scoped to `(queue, job_set_id)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    pub priority: f64,

    /// Target namespace; defaults to `"default"` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,

    /// Deprecated: merged into every pod's `node_selector`.
    pub required_node_labels: BTreeMap<String, String>,

    /// Deprecated singular pod spec; exactly one of this or `pod_specs`
    /// must be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_spec: Option<PodSpec>,
    pub pod_specs: Vec<PodSpec>,

    pub ingress: Vec<IngressConfig>,
    pub services: Vec<ServiceConfig>,
}

/// Submit jobs into one job set of one queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitJobsRequest {
    pub queue: String,
    pub job_set_id: String,
    #[serde(default)]
    pub items: Vec<JobSubmitItem>,
}

/// Cancel one job by id, or a whole job set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelJobsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_set_id: Option<String>,
}

/// Change the priority of jobs named by id, or of a whole job set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprioritizeJobsRequest {
    pub job_ids: Vec<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_set_id: Option<String>,
    pub new_priority: f64,
}

/// Request from a client to the submit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "submit_jobs")]
    SubmitJobs(SubmitJobsRequest),

    #[serde(rename = "cancel_jobs")]
    CancelJobs(CancelJobsRequest),

    #[serde(rename = "reprioritize_jobs")]
    ReprioritizeJobs(ReprioritizeJobsRequest),

    #[serde(rename = "create_queue")]
    CreateQueue { queue: Queue },

    #[serde(rename = "update_queue")]
    UpdateQueue { queue: Queue },

    #[serde(rename = "delete_queue")]
    DeleteQueue { name: String },

    #[serde(rename = "get_queue")]
    GetQueue { name: String },

    #[serde(rename = "get_queue_info")]
    GetQueueInfo { name: String },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
