// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SubmitJobs: validate, default, authorize, persist, and report.

use flotilla_core::{Event, GlobalPermission, Job, Queue, Verb, DEFAULT_NAMESPACE};
use tracing::{info, warn};

use super::{registry_err, store_err, SubmitServer};
use crate::auth::QueueGrant;
use crate::defaulting::{
    apply_default_tolerations, apply_resource_defaults, merge_required_node_labels,
    substitute_job_id_values,
};
use crate::error::{ApiError, Partial};
use crate::feasibility::{check_feasible, FeasibilityError};
use crate::protocol::{JobSubmitResult, SubmitJobsRequest};
use crate::repository::RegistryError;
use crate::scope::RequestScope;
use crate::validation::{validate_ingress, validate_item_shape, validate_pod_spec};

const OP: &str = "SubmitJobs";

impl SubmitServer {
    /// Submit a batch of jobs into one job set.
    ///
    /// Errors are staged: anything before the `submitted` events aborts
    /// with no side effects; a store failure emits `failed` events and
    /// aborts; a failure while reporting outcomes returns internal with
    /// the per-item results already assembled.
    pub async fn submit_jobs(
        &self,
        scope: &RequestScope,
        req: SubmitJobsRequest,
    ) -> Result<Vec<JobSubmitResult>, ApiError> {
        self.ensure_deadline(OP, scope)?;
        if req.queue.is_empty() {
            return Err(ApiError::invalid_argument(OP, "queue must not be empty"));
        }
        if req.job_set_id.is_empty() {
            return Err(ApiError::invalid_argument(OP, "job_set_id must not be empty"));
        }
        if req.items.is_empty() {
            return Ok(Vec::new());
        }

        let queue = self.resolve_queue(scope, &req.queue).await?;
        let grant = self
            .authorizer
            .authorize_queue_verb(scope.principal(), &queue, Verb::Submit)
            .map_err(|e| ApiError::permission_denied(OP, e.to_string()))?;

        let jobs = self.build_jobs(scope, &req, &grant)?;

        let clusters = self
            .scheduling_info
            .get_all()
            .await
            .map_err(|e| ApiError::unavailable(OP, e.to_string()))?;
        check_feasible(&jobs, &clusters).map_err(|e| match e {
            FeasibilityError::NoClusters => ApiError::unavailable(OP, e.to_string()),
            FeasibilityError::Unschedulable { .. } | FeasibilityError::BadQuantity { .. } => {
                ApiError::invalid_argument(OP, e.to_string())
            }
        })?;

        let now = self.clock.now_utc();
        let principal = scope.principal_name().to_string();
        let submitted: Vec<Event> = jobs
            .iter()
            .map(|job| Event::Submitted {
                job: job.clone(),
                created: now,
                principal: principal.clone(),
            })
            .collect();
        self.append_events(OP, submitted).await?;

        let add_results = match self.store.add_jobs(jobs.clone()).await {
            Ok(results) => results,
            Err(store_error) => {
                // The write may or may not have landed; record failure
                // for every job before aborting.
                let now = self.clock.now_utc();
                let failed: Vec<Event> = jobs
                    .iter()
                    .map(|job| Event::Failed {
                        job_id: job.id.clone(),
                        queue: job.queue.clone(),
                        job_set_id: job.job_set_id.clone(),
                        reason: store_error.to_string(),
                        created: now,
                        principal: principal.clone(),
                    })
                    .collect();
                if let Err(sink_error) = self.sink.append(failed).await {
                    warn!(error = %sink_error, "failed to report job store failure");
                }
                return Err(store_err(OP, store_error));
            }
        };

        let now = self.clock.now_utc();
        let mut results = Vec::with_capacity(jobs.len());
        let mut follow_up = Vec::with_capacity(jobs.len());
        for (job, outcome) in jobs.iter().zip(&add_results) {
            if let Some(error) = &outcome.error {
                results.push(JobSubmitResult {
                    job_id: job.id.clone(),
                    error: Some(error.clone()),
                });
                follow_up.push(Event::Failed {
                    job_id: job.id.clone(),
                    queue: job.queue.clone(),
                    job_set_id: job.job_set_id.clone(),
                    reason: error.clone(),
                    created: now,
                    principal: principal.clone(),
                });
            } else if outcome.duplicate {
                results.push(JobSubmitResult { job_id: outcome.job_id.clone(), error: None });
                follow_up.push(Event::DuplicateFound {
                    job_id: job.id.clone(),
                    original_job_id: outcome.job_id.clone(),
                    queue: job.queue.clone(),
                    job_set_id: job.job_set_id.clone(),
                    created: now,
                    principal: principal.clone(),
                });
            } else {
                results.push(JobSubmitResult { job_id: job.id.clone(), error: None });
                follow_up.push(Event::Queued {
                    job_id: job.id.clone(),
                    queue: job.queue.clone(),
                    job_set_id: job.job_set_id.clone(),
                    created: now,
                    principal: principal.clone(),
                });
            }
        }

        if let Err(sink_error) = self.sink.append(follow_up).await {
            return Err(ApiError::internal(
                OP,
                format!("jobs stored but outcome events were not appended: {sink_error}"),
            )
            .with_partial(Partial::Submitted(results)));
        }

        info!(
            queue = %req.queue,
            job_set_id = %req.job_set_id,
            count = results.len(),
            principal = %principal,
            "submitted jobs"
        );
        Ok(results)
    }

    /// Resolve the target queue, auto-creating it when policy allows.
    async fn resolve_queue(&self, scope: &RequestScope, name: &str) -> Result<Queue, ApiError> {
        match self.registry.get(name).await {
            Ok(queue) => Ok(queue),
            Err(RegistryError::NotFound(_))
                if self.config.auto_create_queues
                    && self
                        .authorizer
                        .checker()
                        .user_has_permission(scope.principal(), GlobalPermission::SubmitAnyJobs) =>
            {
                let mut queue = Queue::named(name, self.config.default_priority_factor);
                queue.user_owners = vec![scope.principal_name().to_string()];
                match self.registry.create(queue.clone()).await {
                    Ok(()) => {
                        info!(queue = %name, owner = %scope.principal_name(), "auto-created queue");
                        Ok(queue)
                    }
                    // Lost the auto-create race; the other submitter's
                    // queue is the one to use.
                    Err(RegistryError::AlreadyExists(_)) => {
                        self.registry.get(name).await.map_err(|e| registry_err(OP, e))
                    }
                    Err(e) => Err(registry_err(OP, e)),
                }
            }
            Err(e) => Err(registry_err(OP, e)),
        }
    }

    /// Validate, default, and enrich every item into a job record.
    fn build_jobs(
        &self,
        scope: &RequestScope,
        req: &SubmitJobsRequest,
        grant: &QueueGrant,
    ) -> Result<Vec<Job>, ApiError> {
        let invalid = |e: crate::validation::ValidationError| {
            ApiError::invalid_argument(OP, e.to_string())
        };
        let now = self.clock.now_utc();
        let mut jobs = Vec::with_capacity(req.items.len());

        for (index, item) in req.items.iter().enumerate() {
            validate_item_shape(index, item).map_err(invalid)?;

            let id = self.id_gen.next_job_id();
            let mut pod_spec = item.pod_spec.clone();
            let mut pod_specs = item.pod_specs.clone();
            for pod in pod_spec.iter_mut().chain(pod_specs.iter_mut()) {
                merge_required_node_labels(pod, &item.required_node_labels);
                apply_resource_defaults(pod, &self.config.default_job_limits);
                apply_default_tolerations(pod, &self.config.default_job_tolerations);
                validate_pod_spec(
                    index,
                    pod,
                    &self.config.scheduling,
                    self.config.max_pod_spec_size_bytes,
                )
                .map_err(invalid)?;
            }
            validate_ingress(index, item).map_err(invalid)?;

            let namespace = item
                .namespace
                .clone()
                .filter(|ns| !ns.is_empty())
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

            jobs.push(Job {
                labels: substitute_job_id_values(&item.labels, &id),
                annotations: substitute_job_id_values(&item.annotations, &id),
                id,
                client_id: item.client_id.clone(),
                queue: req.queue.clone(),
                job_set_id: req.job_set_id.clone(),
                namespace,
                pod_spec,
                pod_specs,
                ingress: item.ingress.clone(),
                services: item.services.clone(),
                priority: item.priority,
                created: now,
                owner: scope.principal_name().to_string(),
                queue_ownership_user_groups: grant.ownership_groups.clone(),
            });
        }
        Ok(jobs)
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
