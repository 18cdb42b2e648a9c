// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Surface errors for the submission API.
//!
//! Every error names the operation in a bracketed tag (the contract for
//! log-correlation tooling) and carries one of the fixed surface codes.
//! Operations that stop partway attach the completed portion, so partial
//! success is surfaced, never hidden.

use crate::protocol::JobSubmitResult;
use flotilla_core::JobId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Surface status codes, mirroring the transport's code set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    PermissionDenied,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    FailedPrecondition,
    Unavailable,
    DeadlineExceeded,
    Internal,
}

flotilla_core::simple_display! {
    ErrorCode {
        PermissionDenied => "permission-denied",
        NotFound => "not-found",
        AlreadyExists => "already-exists",
        InvalidArgument => "invalid-argument",
        FailedPrecondition => "failed-precondition",
        Unavailable => "unavailable",
        DeadlineExceeded => "deadline-exceeded",
        Internal => "internal",
    }
}

/// Work an operation completed before returning an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partial {
    /// Per-item submit results assembled before reporting failed.
    Submitted(Vec<JobSubmitResult>),
    /// Ids cancelled before the operation stopped.
    Cancelled(Vec<JobId>),
    /// Per-id reprioritize outcomes assembled before reporting failed.
    Reprioritized(BTreeMap<JobId, Option<String>>),
}

/// An error surfaced to the caller of a facade operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[{op}] {message}")]
pub struct ApiError {
    /// Operation tag, e.g. `SubmitJobs`.
    pub op: &'static str,
    pub code: ErrorCode,
    pub message: String,
    /// Completed portion for operations that stopped partway.
    pub partial: Option<Partial>,
}

impl ApiError {
    pub fn new(op: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self { op, code, message: message.into(), partial: None }
    }

    pub fn with_partial(mut self, partial: Partial) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn permission_denied(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::PermissionDenied, message)
    }

    pub fn not_found(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::NotFound, message)
    }

    pub fn already_exists(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::AlreadyExists, message)
    }

    pub fn invalid_argument(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::InvalidArgument, message)
    }

    pub fn failed_precondition(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::FailedPrecondition, message)
    }

    pub fn unavailable(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::Unavailable, message)
    }

    pub fn deadline_exceeded(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::DeadlineExceeded, message)
    }

    pub fn internal(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorCode::Internal, message)
    }
}
