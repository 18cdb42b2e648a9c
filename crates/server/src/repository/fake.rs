// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory collaborator fakes for tests.

use super::*;
use flotilla_core::Event;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

/// In-memory queue registry with injectable outage.
#[derive(Default)]
pub(crate) struct MemQueueRegistry {
    queues: Mutex<BTreeMap<String, Queue>>,
    job_sets: Mutex<BTreeMap<String, Vec<JobSetInfo>>>,
    outage: Mutex<Option<String>>,
}

impl MemQueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_queue(&self, queue: Queue) {
        self.queues.lock().insert(queue.name.clone(), queue);
    }

    pub fn set_active_job_sets(&self, queue: &str, sets: Vec<JobSetInfo>) {
        self.job_sets.lock().insert(queue.to_string(), sets);
    }

    pub fn set_outage(&self, reason: &str) {
        *self.outage.lock() = Some(reason.to_string());
    }

    pub fn queue(&self, name: &str) -> Option<Queue> {
        self.queues.lock().get(name).cloned()
    }

    fn check_outage(&self) -> Result<(), RegistryError> {
        match self.outage.lock().as_ref() {
            Some(reason) => Err(RegistryError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueueRegistry for MemQueueRegistry {
    async fn get(&self, name: &str) -> Result<Queue, RegistryError> {
        self.check_outage()?;
        self.queues
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    async fn create(&self, queue: Queue) -> Result<(), RegistryError> {
        self.check_outage()?;
        let mut queues = self.queues.lock();
        if queues.contains_key(&queue.name) {
            return Err(RegistryError::AlreadyExists(queue.name));
        }
        queues.insert(queue.name.clone(), queue);
        Ok(())
    }

    async fn update(&self, queue: Queue) -> Result<(), RegistryError> {
        self.check_outage()?;
        let mut queues = self.queues.lock();
        if !queues.contains_key(&queue.name) {
            return Err(RegistryError::NotFound(queue.name));
        }
        queues.insert(queue.name.clone(), queue);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), RegistryError> {
        self.check_outage()?;
        self.queues
            .lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    async fn get_active_job_sets(&self, name: &str) -> Result<Vec<JobSetInfo>, RegistryError> {
        self.check_outage()?;
        if !self.queues.lock().contains_key(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        Ok(self.job_sets.lock().get(name).cloned().unwrap_or_default())
    }
}

/// In-memory job store with client-id dedup and injectable conflicts,
/// delete failures, and outage.
#[derive(Default)]
pub(crate) struct MemJobStore {
    jobs: Mutex<BTreeMap<JobId, Job>>,
    by_client: Mutex<BTreeMap<(String, String, String), JobId>>,
    conflicts: Mutex<HashSet<JobId>>,
    delete_failures: Mutex<BTreeMap<JobId, String>>,
    outage: Mutex<Option<String>>,
}

impl MemJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outage(&self, reason: &str) {
        *self.outage.lock() = Some(reason.to_string());
    }

    /// Make `update_jobs` report a write conflict for this id.
    pub fn set_conflict(&self, id: &JobId) {
        self.conflicts.lock().insert(id.clone());
    }

    /// Make `delete_jobs` fail for this id.
    pub fn set_delete_failure(&self, id: &JobId, reason: &str) {
        self.delete_failures.lock().insert(id.clone(), reason.to_string());
    }

    pub fn job(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().get(id).cloned()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    fn check_outage(&self) -> Result<(), StoreError> {
        match self.outage.lock().as_ref() {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobStore for MemJobStore {
    async fn add_jobs(&self, jobs: Vec<Job>) -> Result<Vec<JobAddResult>, StoreError> {
        self.check_outage()?;
        let mut stored = self.jobs.lock();
        let mut by_client = self.by_client.lock();
        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            if let Some(key) = job.client_key() {
                if let Some(existing) = by_client.get(&key) {
                    results.push(JobAddResult {
                        job_id: existing.clone(),
                        duplicate: true,
                        error: None,
                    });
                    continue;
                }
                by_client.insert(key, job.id.clone());
            }
            results.push(JobAddResult { job_id: job.id.clone(), duplicate: false, error: None });
            stored.insert(job.id.clone(), job);
        }
        Ok(results)
    }

    async fn get_existing_jobs_by_ids(&self, ids: &[JobId]) -> Result<Vec<Job>, StoreError> {
        self.check_outage()?;
        let stored = self.jobs.lock();
        Ok(ids.iter().filter_map(|id| stored.get(id).cloned()).collect())
    }

    async fn get_active_job_ids(
        &self,
        queue: &str,
        job_set_id: &str,
    ) -> Result<Vec<JobId>, StoreError> {
        self.check_outage()?;
        Ok(self
            .jobs
            .lock()
            .values()
            .filter(|job| job.queue == queue && job.job_set_id == job_set_id)
            .map(|job| job.id.clone())
            .collect())
    }

    async fn update_jobs<'a>(
        &'a self,
        ids: &'a [JobId],
        mutate: &'a (dyn for<'b> Fn(&'b mut Job) + Send + Sync),
    ) -> Result<Vec<JobUpdateResult>, StoreError> {
        self.check_outage()?;
        let mut stored = self.jobs.lock();
        let conflicts = self.conflicts.lock();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = if conflicts.contains(id) {
                JobUpdateOutcome::Conflict("concurrent modification".to_string())
            } else {
                match stored.get_mut(id) {
                    Some(job) => {
                        mutate(job);
                        JobUpdateOutcome::Updated(job.clone())
                    }
                    None => JobUpdateOutcome::NotFound,
                }
            };
            results.push(JobUpdateResult { job_id: id.clone(), outcome });
        }
        Ok(results)
    }

    async fn delete_jobs(
        &self,
        jobs: &[Job],
    ) -> Result<HashMap<JobId, Option<String>>, StoreError> {
        self.check_outage()?;
        let mut stored = self.jobs.lock();
        let mut by_client = self.by_client.lock();
        let failures = self.delete_failures.lock();
        let mut results = HashMap::with_capacity(jobs.len());
        for job in jobs {
            if let Some(reason) = failures.get(&job.id) {
                results.insert(job.id.clone(), Some(reason.clone()));
                continue;
            }
            match stored.remove(&job.id) {
                Some(removed) => {
                    if let Some(key) = removed.client_key() {
                        by_client.remove(&key);
                    }
                    results.insert(job.id.clone(), None);
                }
                None => {
                    results.insert(job.id.clone(), Some("job not found".to_string()));
                }
            }
        }
        Ok(results)
    }
}

/// Event sink that records appended events, with an optional capacity
/// after which appends fail (for post-write error paths).
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<Event>>,
    fail_after: Mutex<Option<usize>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` events, then fail every later append.
    pub fn fail_after(&self, count: usize) {
        *self.fail_after.lock() = Some(count);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Kinds of all recorded events, in append order.
    pub fn kinds(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.to_string()).collect()
    }

    /// Kinds of recorded events for one job, in append order.
    pub fn kinds_for(&self, job_id: &JobId) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.job_id() == job_id)
            .map(|e| e.to_string())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn append(&self, events: Vec<Event>) -> Result<(), SinkError> {
        let mut recorded = self.events.lock();
        if let Some(limit) = *self.fail_after.lock() {
            if recorded.len() + events.len() > limit {
                return Err(SinkError::Unavailable("sink full".to_string()));
            }
        }
        recorded.extend(events);
        Ok(())
    }
}

/// Fixed cluster capacity view.
#[derive(Default)]
pub(crate) struct StaticSchedulingInfo {
    clusters: HashMap<String, ClusterSchedulingInfo>,
    outage: Mutex<Option<String>>,
}

impl StaticSchedulingInfo {
    pub fn new(clusters: HashMap<String, ClusterSchedulingInfo>) -> Self {
        Self { clusters, outage: Mutex::new(None) }
    }

    pub fn set_outage(&self, reason: &str) {
        *self.outage.lock() = Some(reason.to_string());
    }
}

#[async_trait]
impl SchedulingInfoSource for StaticSchedulingInfo {
    async fn get_all(&self) -> Result<HashMap<String, ClusterSchedulingInfo>, SchedulingInfoError> {
        match self.outage.lock().as_ref() {
            Some(reason) => Err(SchedulingInfoError::Unavailable(reason.clone())),
            None => Ok(self.clusters.clone()),
        }
    }
}
