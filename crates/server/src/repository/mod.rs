// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator contracts for durable state and cluster views.
//!
//! The facade holds each collaborator as an `Arc<dyn …>` and assumes any
//! call may block arbitrarily long or fail as unavailable. All mutable
//! state lives behind these seams; the facade itself carries only
//! immutable configuration.

use async_trait::async_trait;
use flotilla_core::resources::ResourceList;
use flotilla_core::{Job, JobId, JobSetInfo, Queue};
use k8s_openapi::api::core::v1::Taint;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from queue registry operations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("queue not found: {0}")]
    NotFound(String),

    #[error("queue already exists: {0}")]
    AlreadyExists(String),

    #[error("queue registry unavailable: {0}")]
    Unavailable(String),
}

/// CRUD over named queues. Strongly consistent for single-key
/// operations.
#[async_trait]
pub trait QueueRegistry: Send + Sync {
    async fn get(&self, name: &str) -> Result<Queue, RegistryError>;

    /// Fails [`RegistryError::AlreadyExists`] on name collision.
    async fn create(&self, queue: Queue) -> Result<(), RegistryError>;

    /// Fails [`RegistryError::NotFound`] when the queue does not exist.
    async fn update(&self, queue: Queue) -> Result<(), RegistryError>;

    async fn delete(&self, name: &str) -> Result<(), RegistryError>;

    /// Job sets within the queue that still hold jobs.
    async fn get_active_job_sets(&self, name: &str) -> Result<Vec<JobSetInfo>, RegistryError>;
}

/// Errors from job store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("job store unavailable: {0}")]
    Unavailable(String),
}

/// Per-job outcome of [`JobStore::add_jobs`], in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAddResult {
    /// Id of the stored job. For duplicates this is the *existing* id,
    /// not the one minted for the attempt.
    pub job_id: JobId,
    /// Set when a job with the same `(queue, job_set_id, client_id)`
    /// already existed; the stored job was not replaced.
    pub duplicate: bool,
    pub error: Option<String>,
}

/// Per-job outcome of [`JobStore::update_jobs`].
#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdateOutcome {
    /// The write committed; carries the snapshot that was stored.
    Updated(Job),
    NotFound,
    /// The optimistic guard rejected the write.
    Conflict(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobUpdateResult {
    pub job_id: JobId,
    pub outcome: JobUpdateOutcome,
}

/// Durable job persistence with atomic per-job add and optimistic
/// update.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Store jobs, deduplicating on `(queue, job_set_id, client_id)`.
    async fn add_jobs(&self, jobs: Vec<Job>) -> Result<Vec<JobAddResult>, StoreError>;

    /// Fetch jobs by id; ids that do not exist are omitted.
    async fn get_existing_jobs_by_ids(&self, ids: &[JobId]) -> Result<Vec<Job>, StoreError>;

    /// Ids of jobs currently stored under `(queue, job_set_id)`.
    async fn get_active_job_ids(
        &self,
        queue: &str,
        job_set_id: &str,
    ) -> Result<Vec<JobId>, StoreError>;

    /// Apply `mutate` to each fetched job under an optimistic guard.
    ///
    /// The mutator must be pure over the job value: events belonging to
    /// an update are emitted by the caller for committed snapshots only.
    async fn update_jobs<'a>(
        &'a self,
        ids: &'a [JobId],
        mutate: &'a (dyn for<'b> Fn(&'b mut Job) + Send + Sync),
    ) -> Result<Vec<JobUpdateResult>, StoreError>;

    /// Delete jobs, reporting a per-job error message for any that could
    /// not be removed.
    async fn delete_jobs(
        &self,
        jobs: &[Job],
    ) -> Result<HashMap<JobId, Option<String>>, StoreError>;
}

/// Errors from the event sink.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only, totally-ordered sink for lifecycle events. Events are
/// durable when `append` returns.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, events: Vec<flotilla_core::Event>) -> Result<(), SinkError>;
}

/// Errors from the scheduling-info oracle.
#[derive(Debug, Clone, Error)]
pub enum SchedulingInfoError {
    #[error("scheduling info unavailable: {0}")]
    Unavailable(String),
}

/// A cluster's advertised capacity, as seen by the feasibility check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSchedulingInfo {
    /// Capacity currently reported available.
    pub available_capacity: ResourceList,
    /// Reservation subtracted before fitting jobs.
    pub minimum_job_reservation: ResourceList,
    pub taints: Vec<Taint>,
}

/// Read-only view of per-cluster available resources and taints.
#[async_trait]
pub trait SchedulingInfoSource: Send + Sync {
    async fn get_all(&self) -> Result<HashMap<String, ClusterSchedulingInfo>, SchedulingInfoError>;
}

#[cfg(test)]
pub(crate) mod fake;
