// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for facade tests.

use std::collections::HashMap;
use std::sync::Arc;

use flotilla_core::resources::ResourceList;
use flotilla_core::{
    FakeClock, GlobalPermission, PermissionBinding, PermissionMap, Principal, Queue, SeqIdGen,
    Subject, Verb,
};
use k8s_openapi::api::core::v1::{Container, PodSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use super::SubmitServer;
use crate::config::SubmitConfig;
use crate::protocol::{JobSubmitItem, SubmitJobsRequest};
use crate::repository::fake::{MemJobStore, MemQueueRegistry, RecordingSink, StaticSchedulingInfo};
use crate::repository::ClusterSchedulingInfo;
use crate::scope::RequestScope;

pub(crate) struct Harness {
    pub registry: Arc<MemQueueRegistry>,
    pub store: Arc<MemJobStore>,
    pub sink: Arc<RecordingSink>,
    pub scheduling_info: Arc<StaticSchedulingInfo>,
    pub clock: Arc<FakeClock>,
    pub server: SubmitServer,
}

pub(crate) fn harness(config: SubmitConfig) -> Harness {
    harness_with_clusters(config, default_clusters())
}

pub(crate) fn harness_with_clusters(
    config: SubmitConfig,
    clusters: HashMap<String, ClusterSchedulingInfo>,
) -> Harness {
    let registry = Arc::new(MemQueueRegistry::new());
    let store = Arc::new(MemJobStore::new());
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(FakeClock::new());
    let scheduling_info = Arc::new(StaticSchedulingInfo::new(clusters));
    let server = SubmitServer::new(
        config,
        registry.clone(),
        store.clone(),
        sink.clone(),
        scheduling_info.clone(),
    )
    .with_clock(clock.clone())
    .with_id_gen(Arc::new(SeqIdGen::new()));
    Harness { registry, store, sink, scheduling_info, clock, server }
}

/// One roomy, untainted cluster.
pub(crate) fn default_clusters() -> HashMap<String, ClusterSchedulingInfo> {
    let available: ResourceList = [
        ("cpu".to_string(), Quantity("1000".to_string())),
        ("memory".to_string(), Quantity("1Ti".to_string())),
    ]
    .into_iter()
    .collect();
    [(
        "cluster-1".to_string(),
        ClusterSchedulingInfo { available_capacity: available, ..Default::default() },
    )]
    .into_iter()
    .collect()
}

/// Permission map granting one global permission to one group.
pub(crate) fn permissions_granting(
    permission: GlobalPermission,
    group: &str,
) -> PermissionMap {
    let mut map = PermissionMap::default();
    map.groups.insert(permission, vec![group.to_string()]);
    map
}

/// Queue granting `verbs` to the named group.
pub(crate) fn queue_for_group(name: &str, group: &str, verbs: Vec<Verb>) -> Queue {
    Queue::builder()
        .name(name)
        .permissions(vec![PermissionBinding {
            subjects: vec![Subject::group(group)],
            verbs,
        }])
        .build()
}

pub(crate) fn scope_for(principal: Principal) -> RequestScope {
    RequestScope::new(principal)
}

/// A pod with one container requesting the given cpu quantity.
pub(crate) fn pod_requesting_cpu(cpu: &str) -> PodSpec {
    PodSpec {
        containers: vec![Container {
            name: "main".to_string(),
            resources: Some(ResourceRequirements {
                requests: Some(
                    [("cpu".to_string(), Quantity(cpu.to_string()))].into_iter().collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub(crate) fn valid_item() -> JobSubmitItem {
    JobSubmitItem { pod_specs: vec![pod_requesting_cpu("1")], ..Default::default() }
}

pub(crate) fn submit_request(queue: &str, job_set_id: &str, items: Vec<JobSubmitItem>) -> SubmitJobsRequest {
    SubmitJobsRequest {
        queue: queue.to_string(),
        job_set_id: job_set_id.to_string(),
        items,
    }
}
