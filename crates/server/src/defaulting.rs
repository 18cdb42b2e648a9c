// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pod-spec defaulting and submission enrichment.
//!
//! Runs after the shape check and before pod validation, so the
//! validator always sees fully-populated request/limit maps.

use flotilla_core::resources::tolerations_match;
use flotilla_core::resources::ResourceList;
use flotilla_core::JobId;
use k8s_openapi::api::core::v1::{PodSpec, ResourceRequirements, Toleration};
use std::collections::BTreeMap;

/// Fill request/limit symmetry and policy defaults on every container.
///
/// After this returns, every resource named in either map of a container
/// appears in both, and resources from `default_limits` absent from both
/// are set to the default on both.
pub fn apply_resource_defaults(pod: &mut PodSpec, default_limits: &ResourceList) {
    for container in &mut pod.containers {
        let resources = container
            .resources
            .get_or_insert_with(ResourceRequirements::default);
        let limits = resources.limits.get_or_insert_with(BTreeMap::new);
        let requests = resources.requests.get_or_insert_with(BTreeMap::new);

        for (resource, quantity) in limits.iter() {
            if !requests.contains_key(resource) {
                requests.insert(resource.clone(), quantity.clone());
            }
        }
        for (resource, quantity) in requests.iter() {
            if !limits.contains_key(resource) {
                limits.insert(resource.clone(), quantity.clone());
            }
        }

        for (resource, quantity) in default_limits {
            if !requests.contains_key(resource) && !limits.contains_key(resource) {
                requests.insert(resource.clone(), quantity.clone());
                limits.insert(resource.clone(), quantity.clone());
            }
        }
    }
}

/// Append each default toleration the pod does not already carry.
pub fn apply_default_tolerations(pod: &mut PodSpec, defaults: &[Toleration]) {
    if defaults.is_empty() {
        return;
    }
    let tolerations = pod.tolerations.get_or_insert_with(Vec::new);
    for default in defaults {
        let already_present = tolerations.iter().any(|t| tolerations_match(t, default));
        if !already_present {
            tolerations.push(default.clone());
        }
    }
}

/// Merge the deprecated `required_node_labels` field into the pod's
/// node selector. Existing selector entries win.
pub fn merge_required_node_labels(pod: &mut PodSpec, labels: &BTreeMap<String, String>) {
    if labels.is_empty() {
        return;
    }
    let selector = pod.node_selector.get_or_insert_with(BTreeMap::new);
    for (key, value) in labels {
        selector.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

/// Replace `{JobId}` with the minted id in a label or annotation value.
///
/// `{{JobId}}` is the escape form and yields the literal string `JobId`.
pub fn substitute_job_id(value: &str, id: &JobId) -> String {
    const ESCAPED: &str = "{{JobId}}";
    const TOKEN: &str = "{JobId}";
    // Hold escapes out with a NUL sentinel so the token pass cannot see
    // the inner `{JobId}` of an escape.
    value
        .replace(ESCAPED, "\u{0}")
        .replace(TOKEN, id.as_str())
        .replace('\u{0}', "JobId")
}

/// Apply [`substitute_job_id`] to every value of a label/annotation map.
pub fn substitute_job_id_values(map: &BTreeMap<String, String>, id: &JobId) -> BTreeMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), substitute_job_id(v, id)))
        .collect()
}

#[cfg(test)]
#[path = "defaulting_tests.rs"]
mod tests;
