// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource-quantity arithmetic and taint/toleration matching over the
//! upstream pod-spec types.

use k8s_openapi::api::core::v1::{PodSpec, Taint, Toleration};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;
use thiserror::Error;

/// Resource name → quantity, as carried on pod specs and cluster reports.
pub type ResourceList = BTreeMap<String, Quantity>;

/// Quantity strings that cannot be interpreted.
#[derive(Debug, Clone, Error)]
#[error("invalid resource quantity {0:?}")]
pub struct InvalidQuantity(pub String);

/// Parse a Kubernetes resource quantity into a scalar.
///
/// Supports plain decimals, scientific notation, decimal suffixes
/// (`n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`) and binary suffixes
/// (`Ki` … `Ei`).
pub fn parse_quantity(quantity: &Quantity) -> Result<f64, InvalidQuantity> {
    let s = quantity.0.trim();
    if s.is_empty() {
        return Err(InvalidQuantity(quantity.0.clone()));
    }

    let (number, multiplier) = match s {
        _ if s.ends_with("Ki") => (&s[..s.len() - 2], 1024f64),
        _ if s.ends_with("Mi") => (&s[..s.len() - 2], 1024f64.powi(2)),
        _ if s.ends_with("Gi") => (&s[..s.len() - 2], 1024f64.powi(3)),
        _ if s.ends_with("Ti") => (&s[..s.len() - 2], 1024f64.powi(4)),
        _ if s.ends_with("Pi") => (&s[..s.len() - 2], 1024f64.powi(5)),
        _ if s.ends_with("Ei") => (&s[..s.len() - 2], 1024f64.powi(6)),
        _ if s.ends_with('n') => (&s[..s.len() - 1], 1e-9),
        _ if s.ends_with('u') => (&s[..s.len() - 1], 1e-6),
        _ if s.ends_with('m') => (&s[..s.len() - 1], 1e-3),
        _ if s.ends_with('k') => (&s[..s.len() - 1], 1e3),
        _ if s.ends_with('M') => (&s[..s.len() - 1], 1e6),
        _ if s.ends_with('G') => (&s[..s.len() - 1], 1e9),
        _ if s.ends_with('T') => (&s[..s.len() - 1], 1e12),
        _ if s.ends_with('P') => (&s[..s.len() - 1], 1e15),
        // A trailing `E` is the exa suffix ("5E"); scientific notation
        // ("1E3") never ends in the exponent marker itself.
        _ if s.ends_with('E') => (&s[..s.len() - 1], 1e18),
        _ => (s, 1f64),
    };

    let value: f64 = number
        .parse()
        .map_err(|_| InvalidQuantity(quantity.0.clone()))?;
    if value.is_nan() || value < 0.0 {
        return Err(InvalidQuantity(quantity.0.clone()));
    }
    Ok(value * multiplier)
}

/// Sum of container resource requests across one pod, parsed to scalars.
pub fn pod_resource_requests(pod: &PodSpec) -> Result<BTreeMap<String, f64>, InvalidQuantity> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for container in &pod.containers {
        let Some(resources) = &container.resources else { continue };
        let Some(requests) = &resources.requests else { continue };
        for (resource, quantity) in requests {
            *totals.entry(resource.clone()).or_insert(0.0) += parse_quantity(quantity)?;
        }
    }
    Ok(totals)
}

/// Parse a resource list into scalars.
pub fn parse_resource_list(list: &ResourceList) -> Result<BTreeMap<String, f64>, InvalidQuantity> {
    list.iter()
        .map(|(name, quantity)| Ok((name.clone(), parse_quantity(quantity)?)))
        .collect()
}

/// True iff `toleration` tolerates `taint` under the upstream matching
/// rules: an empty key requires operator `Exists` and matches any taint;
/// operator `Equal` (the default) also compares values; an unset effect
/// matches every effect.
pub fn tolerates_taint(toleration: &Toleration, taint: &Taint) -> bool {
    let operator = toleration.operator.as_deref().unwrap_or("Equal");

    let key_matches = match toleration.key.as_deref() {
        None | Some("") => operator == "Exists",
        Some(key) => key == taint.key,
    };
    if !key_matches {
        return false;
    }

    let effect_matches = match toleration.effect.as_deref() {
        None | Some("") => true,
        Some(effect) => effect == taint.effect,
    };
    if !effect_matches {
        return false;
    }

    match operator {
        "Exists" => true,
        "Equal" => {
            toleration.value.as_deref().unwrap_or("") == taint.value.as_deref().unwrap_or("")
        }
        _ => false,
    }
}

/// True iff the pod tolerates every scheduling-relevant taint
/// (`NoSchedule` and `NoExecute`; `PreferNoSchedule` is advisory).
pub fn pod_tolerates_taints(pod: &PodSpec, taints: &[Taint]) -> bool {
    let tolerations: &[Toleration] = pod.tolerations.as_deref().unwrap_or(&[]);
    taints
        .iter()
        .filter(|taint| taint.effect == "NoSchedule" || taint.effect == "NoExecute")
        .all(|taint| tolerations.iter().any(|tol| tolerates_taint(tol, taint)))
}

/// Structural equality for tolerations, used when defaulting decides
/// whether a policy toleration is already present on a pod.
pub fn tolerations_match(a: &Toleration, b: &Toleration) -> bool {
    let norm = |v: &Option<String>| v.clone().unwrap_or_default();
    norm(&a.key) == norm(&b.key)
        && a.operator.as_deref().unwrap_or("Equal") == b.operator.as_deref().unwrap_or("Equal")
        && norm(&a.value) == norm(&b.value)
        && norm(&a.effect) == norm(&b.effect)
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
