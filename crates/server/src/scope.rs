// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request context: the acting principal and the caller's deadline.
//!
//! The transport layer builds one `RequestScope` per request and hands
//! it to every facade operation; nothing is smuggled through task-local
//! state.

use flotilla_core::Principal;
use std::time::{Duration, Instant};

/// The ambient context of one request.
#[derive(Debug, Clone)]
pub struct RequestScope {
    principal: Principal,
    deadline: Option<Instant>,
}

impl RequestScope {
    /// A scope without a deadline.
    pub fn new(principal: Principal) -> Self {
        Self { principal, deadline: None }
    }

    /// A scope for a request with no attached identity.
    pub fn anonymous() -> Self {
        Self::new(Principal::anonymous())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Name of the acting principal, for logs and events.
    pub fn principal_name(&self) -> &str {
        &self.principal.name
    }

    /// Time left before the caller's deadline; `None` when the request
    /// carries no deadline.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// True when the remaining time is below `margin`. Requests without
    /// a deadline never run out.
    pub fn within_margin(&self, margin: Duration) -> bool {
        self.time_remaining().is_some_and(|left| left < margin)
    }

    /// True once the deadline has passed.
    pub fn expired(&self) -> bool {
        self.time_remaining().is_some_and(|left| left.is_zero())
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
