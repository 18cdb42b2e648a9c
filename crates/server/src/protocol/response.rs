// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{ApiError, ErrorCode, Partial};
use flotilla_core::{JobId, JobSetInfo, Queue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-item outcome of a submit, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmitResult {
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response from the submit service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Queue create/update/delete completed.
    #[serde(rename = "ok")]
    Ok,

    #[serde(rename = "jobs_submitted")]
    JobsSubmitted { results: Vec<JobSubmitResult> },

    #[serde(rename = "jobs_cancelled")]
    JobsCancelled { cancelled_ids: Vec<JobId> },

    /// job id → error message, `None` for committed updates.
    #[serde(rename = "jobs_reprioritized")]
    JobsReprioritized { results: BTreeMap<JobId, Option<String>> },

    #[serde(rename = "queue")]
    Queue { queue: Queue },

    #[serde(rename = "queue_info")]
    QueueInfo { active_job_sets: Vec<JobSetInfo> },

    #[serde(rename = "error")]
    Error {
        code: ErrorCode,
        message: String,
        /// Work completed before the operation stopped.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        partial: Option<Partial>,
    },
}

impl From<ApiError> for Response {
    fn from(err: ApiError) -> Self {
        Response::Error {
            code: err.code,
            message: err.to_string(),
            partial: err.partial,
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
