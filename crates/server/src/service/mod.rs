// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The submit service facade.
//!
//! Every operation authenticates via the request scope, authorizes
//! through the two-tier permission check, reads or writes through the
//! registry and store, and emits lifecycle events to the sink. The
//! facade holds only immutable configuration; requests run concurrently
//! and each is sequential internally.

mod cancel;
mod queues;
mod reprioritize;
mod submit;

use std::sync::Arc;

use flotilla_core::{
    Clock, Event, IdGen, PermissionChecker, SystemClock, TimeOrderedIdGen,
};
use tracing::debug;

use crate::auth::Authorizer;
use crate::config::SubmitConfig;
use crate::error::ApiError;
use crate::protocol::{Request, Response};
use crate::repository::{
    EventSink, JobStore, QueueRegistry, RegistryError, SchedulingInfoSource, StoreError,
};
use crate::scope::RequestScope;

/// The authorization-aware, event-sourced command surface that mediates
/// every mutation of queues and jobs.
pub struct SubmitServer {
    config: SubmitConfig,
    authorizer: Authorizer,
    registry: Arc<dyn QueueRegistry>,
    store: Arc<dyn JobStore>,
    sink: Arc<dyn EventSink>,
    scheduling_info: Arc<dyn SchedulingInfoSource>,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
}

impl SubmitServer {
    pub fn new(
        config: SubmitConfig,
        registry: Arc<dyn QueueRegistry>,
        store: Arc<dyn JobStore>,
        sink: Arc<dyn EventSink>,
        scheduling_info: Arc<dyn SchedulingInfoSource>,
    ) -> Self {
        let authorizer = Authorizer::new(PermissionChecker::new(config.permissions.clone()));
        Self {
            config,
            authorizer,
            registry,
            store,
            sink,
            scheduling_info,
            clock: Arc::new(SystemClock),
            id_gen: Arc::new(TimeOrderedIdGen::new()),
        }
    }

    /// Replace the clock (tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator (tests).
    pub fn with_id_gen(mut self, id_gen: Arc<dyn IdGen>) -> Self {
        self.id_gen = id_gen;
        self
    }

    /// Dispatch one request to its operation and fold errors into the
    /// response.
    pub async fn handle(&self, scope: &RequestScope, request: Request) -> Response {
        debug!(principal = %scope.principal_name(), request = %request_name(&request), "handling request");
        match request {
            Request::SubmitJobs(req) => self
                .submit_jobs(scope, req)
                .await
                .map(|results| Response::JobsSubmitted { results })
                .unwrap_or_else(Response::from),

            Request::CancelJobs(req) => self
                .cancel_jobs(scope, req)
                .await
                .map(|cancelled_ids| Response::JobsCancelled { cancelled_ids })
                .unwrap_or_else(Response::from),

            Request::ReprioritizeJobs(req) => self
                .reprioritize_jobs(scope, req)
                .await
                .map(|results| Response::JobsReprioritized { results })
                .unwrap_or_else(Response::from),

            Request::CreateQueue { queue } => self
                .create_queue(scope, queue)
                .await
                .map(|()| Response::Ok)
                .unwrap_or_else(Response::from),

            Request::UpdateQueue { queue } => self
                .update_queue(scope, queue)
                .await
                .map(|()| Response::Ok)
                .unwrap_or_else(Response::from),

            Request::DeleteQueue { name } => self
                .delete_queue(scope, &name)
                .await
                .map(|()| Response::Ok)
                .unwrap_or_else(Response::from),

            Request::GetQueue { name } => self
                .get_queue(scope, &name)
                .await
                .map(|queue| Response::Queue { queue })
                .unwrap_or_else(Response::from),

            Request::GetQueueInfo { name } => self
                .get_queue_info(scope, &name)
                .await
                .map(|active_job_sets| Response::QueueInfo { active_job_sets })
                .unwrap_or_else(Response::from),
        }
    }

    /// Abandon an operation whose caller deadline has already passed.
    fn ensure_deadline(&self, op: &'static str, scope: &RequestScope) -> Result<(), ApiError> {
        if scope.expired() {
            return Err(ApiError::deadline_exceeded(op, "request deadline expired"));
        }
        Ok(())
    }

    /// Append events, surfacing sink failures as unavailable.
    async fn append_events(&self, op: &'static str, events: Vec<Event>) -> Result<(), ApiError> {
        if events.is_empty() {
            return Ok(());
        }
        self.sink
            .append(events)
            .await
            .map_err(|e| ApiError::unavailable(op, e.to_string()))
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::SubmitJobs(_) => "SubmitJobs",
        Request::CancelJobs(_) => "CancelJobs",
        Request::ReprioritizeJobs(_) => "ReprioritizeJobs",
        Request::CreateQueue { .. } => "CreateQueue",
        Request::UpdateQueue { .. } => "UpdateQueue",
        Request::DeleteQueue { .. } => "DeleteQueue",
        Request::GetQueue { .. } => "GetQueue",
        Request::GetQueueInfo { .. } => "GetQueueInfo",
    }
}

pub(crate) fn registry_err(op: &'static str, err: RegistryError) -> ApiError {
    match err {
        RegistryError::NotFound(_) => ApiError::not_found(op, err.to_string()),
        RegistryError::AlreadyExists(_) => ApiError::already_exists(op, err.to_string()),
        RegistryError::Unavailable(_) => ApiError::unavailable(op, err.to_string()),
    }
}

pub(crate) fn store_err(op: &'static str, err: StoreError) -> ApiError {
    ApiError::unavailable(op, err.to_string())
}

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
