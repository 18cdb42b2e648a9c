// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle events appended to the event sink.
//!
//! Per-job order is observable downstream and must follow the state
//! machine: `submitted → (queued | duplicate_found | failed)`,
//! `→ cancelling → cancelled`, `→ reprioritizing → updated →
//! reprioritized`. Cross-job order is sink-determined.
//!
//! Serializes with `{"type": "job:name", ...fields}` format.

use crate::id::JobId;
use crate::job::Job;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single lifecycle transition for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The job passed validation and was handed to the store.
    #[serde(rename = "job:submitted")]
    Submitted {
        job: Job,
        created: DateTime<Utc>,
        principal: String,
    },

    /// The job is durably stored and visible to schedulers.
    #[serde(rename = "job:queued")]
    Queued {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        created: DateTime<Utc>,
        principal: String,
    },

    /// Submission matched an existing `(queue, job_set_id, client_id)`.
    #[serde(rename = "job:duplicate_found")]
    DuplicateFound {
        /// Id minted for the attempted submission.
        job_id: JobId,
        /// Id of the job already stored under the client id.
        original_job_id: JobId,
        queue: String,
        job_set_id: String,
        created: DateTime<Utc>,
        principal: String,
    },

    /// The job could not be stored.
    #[serde(rename = "job:failed")]
    Failed {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        reason: String,
        created: DateTime<Utc>,
        principal: String,
    },

    /// Cancellation was requested and is being applied.
    #[serde(rename = "job:cancelling")]
    Cancelling {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        created: DateTime<Utc>,
        principal: String,
    },

    /// The job was removed from the store.
    #[serde(rename = "job:cancelled")]
    Cancelled {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        created: DateTime<Utc>,
        principal: String,
    },

    /// The stored job record changed.
    #[serde(rename = "job:updated")]
    Updated {
        job: Job,
        created: DateTime<Utc>,
        principal: String,
    },

    /// A priority change was requested and is being applied.
    #[serde(rename = "job:reprioritizing")]
    Reprioritizing {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        new_priority: f64,
        created: DateTime<Utc>,
        principal: String,
    },

    /// The priority change committed.
    #[serde(rename = "job:reprioritized")]
    Reprioritized {
        job_id: JobId,
        queue: String,
        job_set_id: String,
        new_priority: f64,
        created: DateTime<Utc>,
        principal: String,
    },
}

impl Event {
    /// The id of the job this event concerns.
    pub fn job_id(&self) -> &JobId {
        match self {
            Event::Submitted { job, .. } | Event::Updated { job, .. } => &job.id,
            Event::Queued { job_id, .. }
            | Event::DuplicateFound { job_id, .. }
            | Event::Failed { job_id, .. }
            | Event::Cancelling { job_id, .. }
            | Event::Cancelled { job_id, .. }
            | Event::Reprioritizing { job_id, .. }
            | Event::Reprioritized { job_id, .. } => job_id,
        }
    }

    /// The queue the job belongs to.
    pub fn queue(&self) -> &str {
        match self {
            Event::Submitted { job, .. } | Event::Updated { job, .. } => &job.queue,
            Event::Queued { queue, .. }
            | Event::DuplicateFound { queue, .. }
            | Event::Failed { queue, .. }
            | Event::Cancelling { queue, .. }
            | Event::Cancelled { queue, .. }
            | Event::Reprioritizing { queue, .. }
            | Event::Reprioritized { queue, .. } => queue,
        }
    }

    /// Event creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        match self {
            Event::Submitted { created, .. }
            | Event::Queued { created, .. }
            | Event::DuplicateFound { created, .. }
            | Event::Failed { created, .. }
            | Event::Cancelling { created, .. }
            | Event::Cancelled { created, .. }
            | Event::Updated { created, .. }
            | Event::Reprioritizing { created, .. }
            | Event::Reprioritized { created, .. } => *created,
        }
    }
}

crate::simple_display! {
    Event {
        Submitted { .. } => "submitted",
        Queued { .. } => "queued",
        DuplicateFound { .. } => "duplicate_found",
        Failed { .. } => "failed",
        Cancelling { .. } => "cancelling",
        Cancelled { .. } => "cancelled",
        Updated { .. } => "updated",
        Reprioritizing { .. } => "reprioritizing",
        Reprioritized { .. } => "reprioritized",
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
