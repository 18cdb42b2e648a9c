// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! flotilla-server: the submission control plane for the Flotilla batch
//! platform.
//!
//! The [`service::SubmitServer`] facade mediates every mutation of
//! queues and jobs: two-tier authorization, pod-spec validation and
//! defaulting, feasibility checks, durable writes with deduplication,
//! and ordered lifecycle event emission. Durable state lives behind the
//! collaborator traits in [`repository`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod auth;
pub mod config;
pub mod defaulting;
pub mod error;
pub mod feasibility;
pub mod protocol;
pub mod repository;
pub mod scope;
pub mod service;
pub mod validation;

pub use auth::{AuthError, Authorizer, QueueGrant};
pub use config::{ConfigError, SchedulingRules, SubmitConfig};
pub use error::{ApiError, ErrorCode, Partial};
pub use protocol::{Request, Response};
pub use scope::RequestScope;
pub use service::SubmitServer;
