// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job record: an immutable-after-creation submission (priority
//! excepted) dispatched to executor clusters by downstream schedulers.

use crate::id::JobId;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::PodSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace used when a submission does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Exposure requested for a job's ports through a generated ingress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngressConfig {
    #[serde(default)]
    pub ports: Vec<i32>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Kind of in-cluster service generated for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    NodePort,
    Headless,
}

/// In-cluster service requested for a job's ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub kind: ServiceKind,
    #[serde(default)]
    pub ports: Vec<i32>,
}

/// A submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Time-ordered unique identifier minted at submission.
    pub id: JobId,
    /// Caller-supplied idempotency key, scoped to `(queue, job_set_id)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub queue: String,
    pub job_set_id: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Deprecated singular pod spec, kept for compatibility with callers
    /// predating `pod_specs`. Use [`Job::all_pod_specs`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_spec: Option<PodSpec>,
    #[serde(default)]
    pub pod_specs: Vec<PodSpec>,
    #[serde(default)]
    pub ingress: Vec<IngressConfig>,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    pub priority: f64,
    /// Submission timestamp (UTC).
    pub created: DateTime<Utc>,
    /// Name of the submitting principal.
    pub owner: String,
    /// Groups through which the owner was granted submit on the queue;
    /// empty when the grant was direct (user subject or global).
    #[serde(default)]
    pub queue_ownership_user_groups: Vec<String>,
}

impl Job {
    /// All pod specs of the job, the deprecated singular field first.
    pub fn all_pod_specs(&self) -> impl Iterator<Item = &PodSpec> {
        self.pod_spec.iter().chain(self.pod_specs.iter())
    }

    /// Mutable variant of [`Job::all_pod_specs`].
    pub fn all_pod_specs_mut(&mut self) -> impl Iterator<Item = &mut PodSpec> {
        self.pod_spec.iter_mut().chain(self.pod_specs.iter_mut())
    }

    /// Deduplication key within the job's set, when the caller supplied
    /// a client id.
    pub fn client_key(&self) -> Option<(String, String, String)> {
        self.client_id
            .as_ref()
            .map(|cid| (self.queue.clone(), self.job_set_id.clone(), cid.clone()))
    }
}

crate::test_builder! {
    pub struct JobBuilder for Job = Job {
        id: JobId::from_string("job-000000"),
        client_id: None,
        queue: "test-queue".to_string(),
        job_set_id: "test-set".to_string(),
        namespace: DEFAULT_NAMESPACE.to_string(),
        labels: BTreeMap::new(),
        annotations: BTreeMap::new(),
        pod_spec: None,
        pod_specs: Vec::new(),
        ingress: Vec::new(),
        services: Vec::new(),
        priority: 0.0,
        created: chrono::Utc::now(),
        owner: "test-user".to_string(),
        queue_ownership_user_groups: Vec::new(),
    };
    into {
        id: JobId,
        queue: String,
        job_set_id: String,
        namespace: String,
        owner: String,
    }
    raw {
        labels: BTreeMap<String, String>,
        annotations: BTreeMap<String, String>,
        pod_specs: Vec<PodSpec>,
        ingress: Vec<IngressConfig>,
        services: Vec<ServiceConfig>,
        priority: f64,
        queue_ownership_user_groups: Vec<String>,
    }
    wrap {
        client_id: String,
        pod_spec: PodSpec,
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
