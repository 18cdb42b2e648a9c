// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ReprioritizeJobs: optimistic priority updates with per-id outcomes.

use std::collections::{BTreeMap, BTreeSet};

use flotilla_core::{Event, Job, JobId, Verb};
use tracing::info;

use super::{registry_err, store_err, SubmitServer};
use crate::error::{ApiError, Partial};
use crate::protocol::ReprioritizeJobsRequest;
use crate::repository::JobUpdateOutcome;
use crate::scope::RequestScope;

const OP: &str = "ReprioritizeJobs";

impl SubmitServer {
    /// Change the priority of jobs named by id or by job set.
    ///
    /// The store applies a pure mutator under its optimistic guard;
    /// `updated` and `reprioritized` events are emitted only for
    /// snapshots that committed. Contended or missing ids surface as
    /// per-id errors with no events.
    pub async fn reprioritize_jobs(
        &self,
        scope: &RequestScope,
        req: ReprioritizeJobsRequest,
    ) -> Result<BTreeMap<JobId, Option<String>>, ApiError> {
        self.ensure_deadline(OP, scope)?;
        let requested: Vec<JobId> = match (req.job_ids.is_empty(), &req.queue, &req.job_set_id) {
            (false, None, None) => req.job_ids.clone(),
            (true, Some(queue), Some(job_set_id)) => self
                .store
                .get_active_job_ids(queue, job_set_id)
                .await
                .map_err(|e| store_err(OP, e))?,
            _ => {
                return Err(ApiError::invalid_argument(
                    OP,
                    "specify either job_ids or both queue and job_set_id",
                ))
            }
        };

        let jobs = self
            .store
            .get_existing_jobs_by_ids(&requested)
            .await
            .map_err(|e| store_err(OP, e))?;

        let queue_names: BTreeSet<&str> = jobs.iter().map(|job| job.queue.as_str()).collect();
        for queue_name in queue_names {
            let queue = self
                .registry
                .get(queue_name)
                .await
                .map_err(|e| registry_err(OP, e))?;
            self.authorizer
                .authorize_queue_verb(scope.principal(), &queue, Verb::Reprioritize)
                .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;
        }

        let principal = scope.principal_name().to_string();
        let new_priority = req.new_priority;
        let now = self.clock.now_utc();
        let announcing: Vec<Event> = jobs
            .iter()
            .map(|job| Event::Reprioritizing {
                job_id: job.id.clone(),
                queue: job.queue.clone(),
                job_set_id: job.job_set_id.clone(),
                new_priority,
                created: now,
                principal: principal.clone(),
            })
            .collect();
        self.append_events(OP, announcing).await?;

        let found_ids: Vec<JobId> = jobs.iter().map(|job| job.id.clone()).collect();
        let outcomes = self
            .store
            .update_jobs(&found_ids, &|job: &mut Job| job.priority = new_priority)
            .await
            .map_err(|e| store_err(OP, e))?;

        let mut results: BTreeMap<JobId, Option<String>> = BTreeMap::new();
        let now = self.clock.now_utc();
        let mut committed: Vec<Event> = Vec::new();
        for result in outcomes {
            match result.outcome {
                JobUpdateOutcome::Updated(job) => {
                    committed.push(Event::Updated {
                        job: job.clone(),
                        created: now,
                        principal: principal.clone(),
                    });
                    committed.push(Event::Reprioritized {
                        job_id: job.id.clone(),
                        queue: job.queue.clone(),
                        job_set_id: job.job_set_id.clone(),
                        new_priority,
                        created: now,
                        principal: principal.clone(),
                    });
                    results.insert(result.job_id, None);
                }
                JobUpdateOutcome::NotFound => {
                    results.insert(result.job_id, Some("job not found".to_string()));
                }
                JobUpdateOutcome::Conflict(reason) => {
                    results.insert(result.job_id, Some(reason));
                }
            }
        }
        // Ids the caller named that the store never returned.
        for job_id in &requested {
            results
                .entry(job_id.clone())
                .or_insert_with(|| Some("job not found".to_string()));
        }

        if let Err(sink_error) = self.sink.append(committed).await {
            return Err(ApiError::internal(
                OP,
                format!("priorities updated but events were not appended: {sink_error}"),
            )
            .with_partial(Partial::Reprioritized(results)));
        }

        info!(
            new_priority,
            updated = results.values().filter(|v| v.is_none()).count(),
            total = results.len(),
            "reprioritized jobs"
        );
        Ok(results)
    }
}

#[cfg(test)]
#[path = "reprioritize_tests.rs"]
mod tests;
