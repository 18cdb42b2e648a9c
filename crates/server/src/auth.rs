// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-tier authorization.
//!
//! A verb on a queue is granted when the caller holds the fleet-wide
//! `*_any` permission OR the queue's own permission bindings grant the
//! verb to a matching subject. Callers of [`Authorizer`] never see the
//! tiers; a denial merges both refusals into one diagnostic.

use flotilla_core::{GlobalPermission, PermissionChecker, Principal, Queue, Verb};
use thiserror::Error;

/// The fleet-wide permission that bypasses per-queue bindings for a verb.
pub fn global_for(verb: Verb) -> GlobalPermission {
    match verb {
        Verb::Submit => GlobalPermission::SubmitAnyJobs,
        Verb::Cancel => GlobalPermission::CancelAnyJobs,
        Verb::Reprioritize => GlobalPermission::ReprioritizeAnyJobs,
        Verb::Watch => GlobalPermission::WatchAllEvents,
    }
}

/// Refusals from both authorization tiers, merged.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(
        "user {principal:?} may not {verb} on queue {queue:?}: \
         missing global permission {global}; queue grants {verb} to \
         neither user {principal:?} nor any of their groups"
    )]
    QueueVerbDenied {
        principal: String,
        verb: Verb,
        queue: String,
        global: GlobalPermission,
    },

    #[error("user {principal:?} is missing required permission {permission}")]
    GlobalDenied {
        principal: String,
        permission: GlobalPermission,
    },
}

/// A successful authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueGrant {
    /// Groups through which the principal holds the verb on the queue;
    /// empty when the grant is direct (user subject) or fleet-wide.
    pub ownership_groups: Vec<String>,
}

/// Composes the global permission check with per-queue bindings.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    checker: PermissionChecker,
}

impl Authorizer {
    pub fn new(checker: PermissionChecker) -> Self {
        Self { checker }
    }

    pub fn checker(&self) -> &PermissionChecker {
        &self.checker
    }

    /// Authorize `verb` on `queue` for `principal`.
    ///
    /// The returned ownership groups follow the audit policy: a caller
    /// granted as a user subject (or fleet-wide) reports no groups; only
    /// group-mediated grants report the granting groups.
    pub fn authorize_queue_verb(
        &self,
        principal: &Principal,
        queue: &Queue,
        verb: Verb,
    ) -> Result<QueueGrant, AuthError> {
        let global = global_for(verb);
        let has_global = self.checker.user_has_permission(principal, global);
        let has_user_grant = queue.grants_user(&principal.name, verb);
        let group_grants = queue.groups_granted(principal, verb);

        if !has_global && !has_user_grant && group_grants.is_empty() {
            return Err(AuthError::QueueVerbDenied {
                principal: principal.name.clone(),
                verb,
                queue: queue.name.clone(),
                global,
            });
        }

        let ownership_groups = if has_user_grant { Vec::new() } else { group_grants };
        Ok(QueueGrant { ownership_groups })
    }

    /// Authorize a fleet-wide permission with no queue tier.
    pub fn authorize_global(
        &self,
        principal: &Principal,
        permission: GlobalPermission,
    ) -> Result<(), AuthError> {
        if self.checker.user_has_permission(principal, permission) {
            Ok(())
        } else {
            Err(AuthError::GlobalDenied {
                principal: principal.name.clone(),
                permission,
            })
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
