// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global permission model.
//!
//! Three independent allow-maps bind each permission to OIDC scopes
//! (machine clients), group membership (humans), and raw claims (custom
//! identity providers). A principal holds a permission as soon as any
//! one of its scopes, groups, or claims is listed for it.

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capabilities that can be granted fleet-wide, bypassing per-queue
/// permission bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalPermission {
    SubmitAnyJobs,
    CancelAnyJobs,
    ReprioritizeAnyJobs,
    WatchAllEvents,
    CreateQueue,
    DeleteQueue,
}

crate::simple_display! {
    GlobalPermission {
        SubmitAnyJobs => "submit_any_jobs",
        CancelAnyJobs => "cancel_any_jobs",
        ReprioritizeAnyJobs => "reprioritize_any_jobs",
        WatchAllEvents => "watch_all_events",
        CreateQueue => "create_queue",
        DeleteQueue => "delete_queue",
    }
}

/// The deployment's permission bindings, usually read from config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionMap {
    /// permission → scopes that grant it
    pub scopes: HashMap<GlobalPermission, Vec<String>>,
    /// permission → groups that grant it
    pub groups: HashMap<GlobalPermission, Vec<String>>,
    /// permission → claims that grant it
    pub claims: HashMap<GlobalPermission, Vec<String>>,
}

/// Resolves global permissions and object ownership for principals.
#[derive(Debug, Clone, Default)]
pub struct PermissionChecker {
    map: PermissionMap,
}

impl PermissionChecker {
    pub fn new(map: PermissionMap) -> Self {
        Self { map }
    }

    /// True iff any of the principal's scopes, groups, or claims is
    /// listed for `permission`.
    pub fn user_has_permission(&self, principal: &Principal, permission: GlobalPermission) -> bool {
        let listed = |table: &HashMap<GlobalPermission, Vec<String>>,
                      held: &std::collections::HashSet<String>| {
            table
                .get(&permission)
                .is_some_and(|values| values.iter().any(|v| held.contains(v)))
        };
        listed(&self.map.scopes, &principal.scopes)
            || listed(&self.map.groups, &principal.groups)
            || listed(&self.map.claims, &principal.claims)
    }

    /// Ownership decision over an object's owner lists.
    ///
    /// A direct user-owner match returns `(true, [])`: audit trails
    /// distinguish "acted as self" from "acted on behalf of a group", so
    /// group memberships are reported only when they are what granted
    /// ownership.
    pub fn user_owns(
        &self,
        principal: &Principal,
        user_owners: &[String],
        group_owners: &[String],
    ) -> (bool, Vec<String>) {
        if user_owners.iter().any(|owner| *owner == principal.name) {
            return (true, Vec::new());
        }
        let shared: Vec<String> = group_owners
            .iter()
            .filter(|group| principal.is_in_group(group))
            .cloned()
            .collect();
        (!shared.is_empty(), shared)
    }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
