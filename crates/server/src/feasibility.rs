// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory feasibility check.
//!
//! Rejects submissions no known cluster could accept given the current
//! capacity snapshots. Capacity may change between check and schedule;
//! the point is to fail hopeless submissions early, not to reserve.

use crate::repository::ClusterSchedulingInfo;
use flotilla_core::resources::{parse_resource_list, pod_resource_requests, pod_tolerates_taints};
use flotilla_core::{Job, JobId};
use k8s_openapi::api::core::v1::PodSpec;
use std::collections::HashMap;
use thiserror::Error;

/// A batch that cannot be scheduled anywhere.
#[derive(Debug, Clone, Error)]
pub enum FeasibilityError {
    #[error("no cluster capacity information is available")]
    NoClusters,

    #[error("job {job_id} does not fit on any known cluster: {reason}")]
    Unschedulable { job_id: JobId, reason: String },

    #[error("job {job_id} carries an invalid resource quantity: {reason}")]
    BadQuantity { job_id: JobId, reason: String },
}

/// Verify every pod of every job fits at least one cluster.
///
/// A cluster fits a pod when its available capacity minus the minimum
/// reservation covers the pod's aggregate requests for every resource,
/// and the pod tolerates the cluster's taints. A single failing job
/// fails the whole batch.
pub fn check_feasible(
    jobs: &[Job],
    clusters: &HashMap<String, ClusterSchedulingInfo>,
) -> Result<(), FeasibilityError> {
    if jobs.is_empty() {
        return Ok(());
    }
    if clusters.is_empty() {
        return Err(FeasibilityError::NoClusters);
    }

    for job in jobs {
        for pod in job.all_pod_specs() {
            check_pod_fits_somewhere(job, pod, clusters)?;
        }
    }
    Ok(())
}

fn check_pod_fits_somewhere(
    job: &Job,
    pod: &PodSpec,
    clusters: &HashMap<String, ClusterSchedulingInfo>,
) -> Result<(), FeasibilityError> {
    let requests = pod_resource_requests(pod).map_err(|e| FeasibilityError::BadQuantity {
        job_id: job.id.clone(),
        reason: e.to_string(),
    })?;

    let mut refusals: Vec<String> = Vec::new();
    for (cluster_id, info) in clusters {
        if !pod_tolerates_taints(pod, &info.taints) {
            refusals.push(format!("{cluster_id}: taints not tolerated"));
            continue;
        }

        let available = parse_resource_list(&info.available_capacity).map_err(|e| {
            FeasibilityError::BadQuantity { job_id: job.id.clone(), reason: e.to_string() }
        })?;
        let reserved = parse_resource_list(&info.minimum_job_reservation).map_err(|e| {
            FeasibilityError::BadQuantity { job_id: job.id.clone(), reason: e.to_string() }
        })?;

        let shortfall = requests.iter().find(|(resource, needed)| {
            let capacity = available.get(*resource).copied().unwrap_or(0.0)
                - reserved.get(*resource).copied().unwrap_or(0.0);
            **needed > capacity
        });

        match shortfall {
            None => return Ok(()),
            Some((resource, needed)) => {
                refusals.push(format!("{cluster_id}: insufficient {resource} (need {needed})"));
            }
        }
    }

    refusals.sort();
    Err(FeasibilityError::Unschedulable {
        job_id: job.id.clone(),
        reason: refusals.join("; "),
    })
}

#[cfg(test)]
#[path = "feasibility_tests.rs"]
mod tests;
