// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use flotilla_core::resources::ResourceList;
use flotilla_core::Job;
use k8s_openapi::api::core::v1::{Container, ResourceRequirements, Taint, Toleration};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

fn q(s: &str) -> Quantity {
    Quantity(s.to_string())
}

fn resource_list(entries: &[(&str, &str)]) -> ResourceList {
    entries.iter().map(|(k, v)| (k.to_string(), q(v))).collect()
}

fn job_requesting(requests: &[(&str, &str)]) -> Job {
    let pod = PodSpec {
        containers: vec![Container {
            name: "main".to_string(),
            resources: Some(ResourceRequirements {
                requests: Some(requests.iter().map(|(k, v)| (k.to_string(), q(v))).collect()),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    };
    Job::builder().id("job-000001").pod_specs(vec![pod]).build()
}

fn cluster(available: &[(&str, &str)], reserved: &[(&str, &str)]) -> ClusterSchedulingInfo {
    ClusterSchedulingInfo {
        available_capacity: resource_list(available),
        minimum_job_reservation: resource_list(reserved),
        taints: Vec::new(),
    }
}

fn clusters(entries: Vec<(&str, ClusterSchedulingInfo)>) -> HashMap<String, ClusterSchedulingInfo> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn empty_batch_is_feasible_without_clusters() {
    assert!(check_feasible(&[], &HashMap::new()).is_ok());
}

#[test]
fn no_clusters_fails_non_empty_batch() {
    let jobs = vec![job_requesting(&[("cpu", "1")])];
    assert!(matches!(
        check_feasible(&jobs, &HashMap::new()),
        Err(FeasibilityError::NoClusters)
    ));
}

#[test]
fn job_fits_when_one_cluster_has_capacity() {
    let jobs = vec![job_requesting(&[("cpu", "2"), ("memory", "1Gi")])];
    let map = clusters(vec![
        ("small", cluster(&[("cpu", "1"), ("memory", "4Gi")], &[])),
        ("large", cluster(&[("cpu", "16"), ("memory", "64Gi")], &[])),
    ]);
    assert!(check_feasible(&jobs, &map).is_ok());
}

#[test]
fn minimum_reservation_is_subtracted() {
    let jobs = vec![job_requesting(&[("cpu", "4")])];
    let map = clusters(vec![(
        "c1",
        cluster(&[("cpu", "5")], &[("cpu", "2")]),
    )]);
    let err = check_feasible(&jobs, &map).unwrap_err();
    assert!(matches!(err, FeasibilityError::Unschedulable { .. }));
    assert!(err.to_string().contains("cpu"));
}

#[test]
fn resource_absent_from_cluster_counts_as_zero() {
    let jobs = vec![job_requesting(&[("nvidia.com/gpu", "1")])];
    let map = clusters(vec![("c1", cluster(&[("cpu", "16")], &[]))]);
    assert!(check_feasible(&jobs, &map).is_err());
}

#[test]
fn untolerated_taint_excludes_cluster() {
    let jobs = vec![job_requesting(&[("cpu", "1")])];
    let mut info = cluster(&[("cpu", "16")], &[]);
    info.taints = vec![Taint {
        key: "dedicated".to_string(),
        value: Some("gpu".to_string()),
        effect: "NoSchedule".to_string(),
        ..Default::default()
    }];
    let map = clusters(vec![("c1", info)]);

    let err = check_feasible(&jobs, &map).unwrap_err();
    assert!(err.to_string().contains("taints not tolerated"));
}

#[test]
fn tolerated_taint_keeps_cluster_eligible() {
    let mut job = job_requesting(&[("cpu", "1")]);
    for pod in job.all_pod_specs_mut() {
        pod.tolerations = Some(vec![Toleration {
            key: Some("dedicated".to_string()),
            operator: Some("Equal".to_string()),
            value: Some("gpu".to_string()),
            effect: Some("NoSchedule".to_string()),
            ..Default::default()
        }]);
    }
    let mut info = cluster(&[("cpu", "16")], &[]);
    info.taints = vec![Taint {
        key: "dedicated".to_string(),
        value: Some("gpu".to_string()),
        effect: "NoSchedule".to_string(),
        ..Default::default()
    }];
    let map = clusters(vec![("c1", info)]);

    assert!(check_feasible(&[job], &map).is_ok());
}

#[test]
fn one_failing_job_fails_the_batch() {
    let fitting = job_requesting(&[("cpu", "1")]);
    let hopeless = Job::builder()
        .id("job-000002")
        .pod_specs(vec![PodSpec {
            containers: vec![Container {
                resources: Some(ResourceRequirements {
                    requests: Some([("cpu".to_string(), q("64"))].into_iter().collect()),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }])
        .build();
    let map = clusters(vec![("c1", cluster(&[("cpu", "16")], &[]))]);

    let err = check_feasible(&[fitting, hopeless], &map).unwrap_err();
    match err {
        FeasibilityError::Unschedulable { job_id, .. } => assert_eq!(job_id, "job-000002"),
        other => panic!("expected Unschedulable, got {:?}", other),
    }
}
