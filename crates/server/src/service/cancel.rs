// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CancelJobs: single-job and batched job-set cancellation.

use std::collections::BTreeSet;

use flotilla_core::{Event, Job, JobId, Verb};
use tracing::{info, warn};

use super::{registry_err, store_err, SubmitServer};
use crate::error::{ApiError, Partial};
use crate::protocol::CancelJobsRequest;
use crate::scope::RequestScope;

const OP: &str = "CancelJobs";

impl SubmitServer {
    /// Cancel one job by id, or a whole job set in batches.
    ///
    /// The set path honors the configured deadline margin: when the
    /// remaining deadline drops below it after a batch, the operation
    /// returns deadline-exceeded carrying the ids cancelled so far.
    pub async fn cancel_jobs(
        &self,
        scope: &RequestScope,
        req: CancelJobsRequest,
    ) -> Result<Vec<JobId>, ApiError> {
        self.ensure_deadline(OP, scope)?;
        match (&req.job_id, &req.queue, &req.job_set_id) {
            (Some(job_id), None, None) => self.cancel_single(scope, job_id).await,
            (None, Some(queue), Some(job_set_id)) => {
                self.cancel_job_set(scope, queue, job_set_id).await
            }
            _ => Err(ApiError::invalid_argument(
                OP,
                "specify either job_id or both queue and job_set_id",
            )),
        }
    }

    async fn cancel_single(
        &self,
        scope: &RequestScope,
        job_id: &JobId,
    ) -> Result<Vec<JobId>, ApiError> {
        let jobs = self
            .store
            .get_existing_jobs_by_ids(std::slice::from_ref(job_id))
            .await
            .map_err(|e| store_err(OP, e))?;
        if jobs.is_empty() {
            return Err(ApiError::not_found(OP, format!("job not found: {job_id}")));
        }
        self.cancel_batch(scope, &jobs).await
    }

    async fn cancel_job_set(
        &self,
        scope: &RequestScope,
        queue: &str,
        job_set_id: &str,
    ) -> Result<Vec<JobId>, ApiError> {
        let ids = self
            .store
            .get_active_job_ids(queue, job_set_id)
            .await
            .map_err(|e| store_err(OP, e))?;

        let margin = self.config.deadline_margin();
        let mut cancelled: Vec<JobId> = Vec::new();

        for batch in ids.chunks(self.config.cancel_jobs_batch_size) {
            let jobs = match self.store.get_existing_jobs_by_ids(batch).await {
                Ok(jobs) => jobs,
                Err(e) => {
                    return Err(store_err(OP, e).with_partial(Partial::Cancelled(cancelled)))
                }
            };

            match self.cancel_batch(scope, &jobs).await {
                Ok(batch_cancelled) => cancelled.extend(batch_cancelled),
                Err(mut err) => {
                    if let Some(Partial::Cancelled(ids)) = err.partial.take() {
                        cancelled.extend(ids);
                    }
                    return Err(err.with_partial(Partial::Cancelled(cancelled)));
                }
            }

            if scope.within_margin(margin) {
                info!(
                    queue = %queue,
                    job_set_id = %job_set_id,
                    cancelled = cancelled.len(),
                    remaining = ids.len() - cancelled.len(),
                    "deadline margin reached during set cancel"
                );
                return Err(ApiError::deadline_exceeded(
                    OP,
                    format!(
                        "deadline expired after cancelling {} of {} jobs",
                        cancelled.len(),
                        ids.len()
                    ),
                )
                .with_partial(Partial::Cancelled(cancelled)));
            }
        }

        info!(queue = %queue, job_set_id = %job_set_id, cancelled = cancelled.len(), "cancelled job set");
        Ok(cancelled)
    }

    /// Cancel one batch of materialized jobs: authorize every distinct
    /// queue, announce, delete, then confirm only what was deleted.
    pub(crate) async fn cancel_batch(
        &self,
        scope: &RequestScope,
        jobs: &[Job],
    ) -> Result<Vec<JobId>, ApiError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let queue_names: BTreeSet<&str> = jobs.iter().map(|job| job.queue.as_str()).collect();
        for queue_name in queue_names {
            let queue = self
                .registry
                .get(queue_name)
                .await
                .map_err(|e| registry_err(OP, e))?;
            self.authorizer
                .authorize_queue_verb(scope.principal(), &queue, Verb::Cancel)
                .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;
        }

        let principal = scope.principal_name().to_string();
        let now = self.clock.now_utc();
        let cancelling: Vec<Event> = jobs
            .iter()
            .map(|job| Event::Cancelling {
                job_id: job.id.clone(),
                queue: job.queue.clone(),
                job_set_id: job.job_set_id.clone(),
                created: now,
                principal: principal.clone(),
            })
            .collect();
        self.append_events(OP, cancelling).await?;

        let outcomes = self
            .store
            .delete_jobs(jobs)
            .await
            .map_err(|e| store_err(OP, e))?;

        let mut deleted: Vec<&Job> = Vec::with_capacity(jobs.len());
        for job in jobs {
            match outcomes.get(&job.id) {
                Some(Some(reason)) => {
                    warn!(job_id = %job.id, error = %reason, "failed to delete job");
                }
                _ => deleted.push(job),
            }
        }

        let now = self.clock.now_utc();
        let confirmed: Vec<Event> = deleted
            .iter()
            .map(|job| Event::Cancelled {
                job_id: job.id.clone(),
                queue: job.queue.clone(),
                job_set_id: job.job_set_id.clone(),
                created: now,
                principal: principal.clone(),
            })
            .collect();
        let cancelled_ids: Vec<JobId> = deleted.iter().map(|job| job.id.clone()).collect();

        if let Err(sink_error) = self.sink.append(confirmed).await {
            return Err(ApiError::internal(
                OP,
                format!("jobs deleted but cancelled events were not appended: {sink_error}"),
            )
            .with_partial(Partial::Cancelled(cancelled_ids)));
        }

        Ok(cancelled_ids)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
