// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use k8s_openapi::api::core::v1::{Container, ResourceRequirements};
use yare::parameterized;

fn q(s: &str) -> Quantity {
    Quantity(s.to_string())
}

#[parameterized(
    plain = { "2", 2.0 },
    fractional = { "0.5", 0.5 },
    millis = { "100m", 0.1 },
    kilo = { "2k", 2_000.0 },
    mega = { "3M", 3_000_000.0 },
    giga = { "1G", 1e9 },
    kibi = { "1Ki", 1024.0 },
    mebi = { "2Mi", 2.0 * 1024.0 * 1024.0 },
    gibi = { "1Gi", 1024.0 * 1024.0 * 1024.0 },
    nano = { "500n", 5e-7 },
    exa = { "5E", 5e18 },
    scientific = { "1E3", 1_000.0 },
)]
fn parses_quantities(input: &str, expected: f64) {
    let parsed = parse_quantity(&q(input)).unwrap();
    assert!(
        (parsed - expected).abs() < 1e-9 * expected.abs().max(1.0),
        "{} parsed to {}, expected {}",
        input,
        parsed,
        expected
    );
}

#[parameterized(
    empty = { "" },
    garbage = { "abc" },
    negative = { "-1" },
    suffix_only = { "Gi" },
)]
fn rejects_bad_quantities(input: &str) {
    assert!(parse_quantity(&q(input)).is_err());
}

fn container_with_requests(requests: &[(&str, &str)]) -> Container {
    Container {
        resources: Some(ResourceRequirements {
            requests: Some(
                requests
                    .iter()
                    .map(|(name, value)| (name.to_string(), q(value)))
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn sums_requests_across_containers() {
    let pod = PodSpec {
        containers: vec![
            container_with_requests(&[("cpu", "500m"), ("memory", "1Gi")]),
            container_with_requests(&[("cpu", "1")]),
        ],
        ..Default::default()
    };
    let totals = pod_resource_requests(&pod).unwrap();
    assert!((totals["cpu"] - 1.5).abs() < 1e-9);
    assert!((totals["memory"] - 1024.0 * 1024.0 * 1024.0).abs() < 1e-3);
}

#[test]
fn containers_without_resources_contribute_nothing() {
    let pod = PodSpec {
        containers: vec![Container::default()],
        ..Default::default()
    };
    assert!(pod_resource_requests(&pod).unwrap().is_empty());
}

fn taint(key: &str, value: &str, effect: &str) -> Taint {
    Taint {
        key: key.to_string(),
        value: Some(value.to_string()),
        effect: effect.to_string(),
        ..Default::default()
    }
}

fn toleration(key: &str, operator: &str, value: &str, effect: &str) -> Toleration {
    Toleration {
        key: if key.is_empty() { None } else { Some(key.to_string()) },
        operator: Some(operator.to_string()),
        value: if value.is_empty() { None } else { Some(value.to_string()) },
        effect: if effect.is_empty() { None } else { Some(effect.to_string()) },
        ..Default::default()
    }
}

#[test]
fn equal_operator_compares_values() {
    let t = taint("gpu", "a100", "NoSchedule");
    assert!(tolerates_taint(&toleration("gpu", "Equal", "a100", "NoSchedule"), &t));
    assert!(!tolerates_taint(&toleration("gpu", "Equal", "v100", "NoSchedule"), &t));
}

#[test]
fn exists_operator_ignores_value() {
    let t = taint("gpu", "a100", "NoSchedule");
    assert!(tolerates_taint(&toleration("gpu", "Exists", "", ""), &t));
}

#[test]
fn empty_key_with_exists_matches_everything() {
    let t = taint("anything", "v", "NoExecute");
    assert!(tolerates_taint(&toleration("", "Exists", "", ""), &t));
    assert!(!tolerates_taint(&toleration("", "Equal", "", ""), &t));
}

#[test]
fn effect_must_match_when_set() {
    let t = taint("gpu", "a100", "NoSchedule");
    assert!(!tolerates_taint(&toleration("gpu", "Exists", "", "NoExecute"), &t));
}

#[test]
fn pod_tolerates_only_scheduling_relevant_taints() {
    let pod = PodSpec {
        containers: vec![Container::default()],
        ..Default::default()
    };
    // PreferNoSchedule is advisory and does not block.
    assert!(pod_tolerates_taints(&pod, &[taint("k", "v", "PreferNoSchedule")]));
    assert!(!pod_tolerates_taints(&pod, &[taint("k", "v", "NoSchedule")]));

    let tolerant = PodSpec {
        tolerations: Some(vec![toleration("k", "Equal", "v", "NoSchedule")]),
        ..pod
    };
    assert!(pod_tolerates_taints(&tolerant, &[taint("k", "v", "NoSchedule")]));
}

#[test]
fn toleration_equality_defaults_operator_to_equal() {
    let explicit = toleration("k", "Equal", "v", "NoSchedule");
    let implicit = Toleration {
        key: Some("k".to_string()),
        operator: None,
        value: Some("v".to_string()),
        effect: Some("NoSchedule".to_string()),
        ..Default::default()
    };
    assert!(tolerations_match(&explicit, &implicit));
    assert!(!tolerations_match(&explicit, &toleration("k", "Exists", "v", "NoSchedule")));
}
