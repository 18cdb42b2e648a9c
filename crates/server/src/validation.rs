// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission validation.
//!
//! Shape checks run before defaulting; pod and ingress checks run on the
//! defaulted specs. Every error names the offending field and the item
//! index so callers can correlate per-item failures.

use crate::config::SchedulingRules;
use crate::protocol::JobSubmitItem;
use flotilla_core::resources::parse_quantity;
use k8s_openapi::api::core::v1::PodSpec;
use std::collections::BTreeSet;
use thiserror::Error;

/// A rejected submission, naming the offending field.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("item {index}: exactly one of pod_spec or pod_specs must be set")]
    PodSpecShape { index: usize },

    #[error("item {index}: pod spec has no containers")]
    NoContainers { index: usize },

    #[error("item {index}: container {container:?}: invalid quantity {value:?} for resource {resource}")]
    BadQuantity {
        index: usize,
        container: String,
        resource: String,
        value: String,
    },

    #[error(
        "item {index}: container {container:?}: resource {resource} request {got} is below the minimum {min}"
    )]
    BelowMinimum {
        index: usize,
        container: String,
        resource: String,
        got: String,
        min: String,
    },

    #[error(
        "item {index}: container {container:?}: resource {resource} request {got} is above the maximum {max}"
    )]
    AboveMaximum {
        index: usize,
        container: String,
        resource: String,
        got: String,
        max: String,
    },

    #[error("item {index}: priority class {name:?} is not permitted")]
    PriorityClassNotPermitted { index: usize, name: String },

    #[error("item {index}: pod spec is {size} bytes, exceeding the maximum of {max}")]
    PodSpecTooLarge { index: usize, size: usize, max: usize },

    #[error("item {index}: {field} is not supported")]
    UnsupportedAffinity { index: usize, field: &'static str },

    #[error("item {index}: pod spec could not be serialized: {reason}")]
    Unserializable { index: usize, reason: String },

    #[error("item {index}: ingress {ingress} specifies no ports")]
    EmptyIngressPorts { index: usize, ingress: usize },

    #[error("item {index}: port {port} is mapped by more than one ingress")]
    DuplicateIngressPort { index: usize, port: i32 },
}

/// A request item must specify exactly one of `pod_spec` or `pod_specs`.
pub fn validate_item_shape(index: usize, item: &JobSubmitItem) -> Result<(), ValidationError> {
    let has_singular = item.pod_spec.is_some();
    let has_plural = !item.pod_specs.is_empty();
    if has_singular == has_plural {
        return Err(ValidationError::PodSpecShape { index });
    }
    Ok(())
}

/// Validate one (defaulted) pod spec against the configured rules.
pub fn validate_pod_spec(
    index: usize,
    pod: &PodSpec,
    rules: &SchedulingRules,
    max_size_bytes: usize,
) -> Result<(), ValidationError> {
    if pod.containers.is_empty() {
        return Err(ValidationError::NoContainers { index });
    }

    let size = serde_json::to_vec(pod)
        .map_err(|e| ValidationError::Unserializable { index, reason: e.to_string() })?
        .len();
    if size > max_size_bytes {
        return Err(ValidationError::PodSpecTooLarge { index, size, max: max_size_bytes });
    }

    if let Some(class) = &pod.priority_class_name {
        if !rules.allowed_priority_classes.is_empty()
            && !rules.allowed_priority_classes.contains(class)
        {
            return Err(ValidationError::PriorityClassNotPermitted {
                index,
                name: class.clone(),
            });
        }
    }

    if let Some(affinity) = &pod.affinity {
        // The leasing layer places whole pods; inter-pod constraints
        // cannot be honored.
        if affinity.pod_affinity.is_some() {
            return Err(ValidationError::UnsupportedAffinity { index, field: "pod_affinity" });
        }
        if affinity.pod_anti_affinity.is_some() {
            return Err(ValidationError::UnsupportedAffinity {
                index,
                field: "pod_anti_affinity",
            });
        }
    }

    for container in &pod.containers {
        let requests = container
            .resources
            .as_ref()
            .and_then(|r| r.requests.as_ref());

        for (resource, minimum) in &rules.min_job_resources {
            let min_value = parse_quantity(minimum).map_err(|_| ValidationError::BadQuantity {
                index,
                container: container.name.clone(),
                resource: resource.clone(),
                value: minimum.0.clone(),
            })?;
            let requested = requests.and_then(|r| r.get(resource));
            let got_value = match requested {
                Some(q) => parse_quantity(q).map_err(|_| ValidationError::BadQuantity {
                    index,
                    container: container.name.clone(),
                    resource: resource.clone(),
                    value: q.0.clone(),
                })?,
                None => 0.0,
            };
            if got_value < min_value {
                return Err(ValidationError::BelowMinimum {
                    index,
                    container: container.name.clone(),
                    resource: resource.clone(),
                    got: requested.map(|q| q.0.clone()).unwrap_or_else(|| "0".to_string()),
                    min: minimum.0.clone(),
                });
            }
        }

        for (resource, maximum) in &rules.max_job_resources {
            let max_value = parse_quantity(maximum).map_err(|_| ValidationError::BadQuantity {
                index,
                container: container.name.clone(),
                resource: resource.clone(),
                value: maximum.0.clone(),
            })?;
            if let Some(q) = requests.and_then(|r| r.get(resource)) {
                let got_value = parse_quantity(q).map_err(|_| ValidationError::BadQuantity {
                    index,
                    container: container.name.clone(),
                    resource: resource.clone(),
                    value: q.0.clone(),
                })?;
                if got_value > max_value {
                    return Err(ValidationError::AboveMaximum {
                        index,
                        container: container.name.clone(),
                        resource: resource.clone(),
                        got: q.0.clone(),
                        max: maximum.0.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Every ingress must expose at least one port, and no port may be
/// claimed by two ingress configurations within one item.
pub fn validate_ingress(index: usize, item: &JobSubmitItem) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<i32> = BTreeSet::new();
    for (ingress_index, ingress) in item.ingress.iter().enumerate() {
        if ingress.ports.is_empty() {
            return Err(ValidationError::EmptyIngressPorts { index, ingress: ingress_index });
        }
        for port in &ingress.ports {
            if !seen.insert(*port) {
                return Err(ValidationError::DuplicateIngressPort { index, port: *port });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
