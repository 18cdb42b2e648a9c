// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queues: named owners of job namespaces with their own permission policy.

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Verbs a queue can grant to subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Submit,
    Cancel,
    Reprioritize,
    Watch,
}

crate::simple_display! {
    Verb {
        Submit => "submit",
        Cancel => "cancel",
        Reprioritize => "reprioritize",
        Watch => "watch",
    }
}

/// Kind of a permission-binding subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    User,
    Group,
}

/// A user or group named in a permission binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
}

impl Subject {
    pub fn user(name: impl Into<String>) -> Self {
        Self { kind: SubjectKind::User, name: name.into() }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self { kind: SubjectKind::Group, name: name.into() }
    }
}

/// Grants a set of verbs to a set of subjects.
///
/// A principal satisfies the binding when it matches any subject: by name
/// for user-kind subjects, by membership for group-kind subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionBinding {
    pub subjects: Vec<Subject>,
    pub verbs: Vec<Verb>,
}

impl PermissionBinding {
    fn lists_verb(&self, verb: Verb) -> bool {
        self.verbs.contains(&verb)
    }

    fn names_user(&self, name: &str) -> bool {
        self.subjects
            .iter()
            .any(|s| s.kind == SubjectKind::User && s.name == name)
    }
}

/// A named owner of a namespace of jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    pub priority_factor: f64,
    #[serde(default)]
    pub user_owners: Vec<String>,
    #[serde(default)]
    pub group_owners: Vec<String>,
    /// resource name → fraction of fleet capacity this queue may hold
    #[serde(default)]
    pub resource_limits: BTreeMap<String, f64>,
    #[serde(default)]
    pub permissions: Vec<PermissionBinding>,
}

impl Queue {
    /// A queue with the given name, default priority factor, and no
    /// owners or bindings.
    pub fn named(name: impl Into<String>, priority_factor: f64) -> Self {
        Self {
            name: name.into(),
            priority_factor,
            user_owners: Vec::new(),
            group_owners: Vec::new(),
            resource_limits: BTreeMap::new(),
            permissions: Vec::new(),
        }
    }

    /// Check queue field invariants.
    pub fn validate(&self) -> Result<(), InvalidQueue> {
        if self.name.is_empty() {
            return Err(InvalidQueue::EmptyName);
        }
        if !(self.priority_factor > 0.0) {
            return Err(InvalidQueue::NonPositivePriorityFactor(self.priority_factor));
        }
        for (resource, fraction) in &self.resource_limits {
            if !(*fraction > 0.0 && *fraction <= 1.0) {
                return Err(InvalidQueue::BadResourceLimit {
                    resource: resource.clone(),
                    fraction: *fraction,
                });
            }
        }
        Ok(())
    }

    /// True iff any binding grants `verb` to the principal by user name.
    pub fn grants_user(&self, name: &str, verb: Verb) -> bool {
        self.permissions
            .iter()
            .any(|b| b.lists_verb(verb) && b.names_user(name))
    }

    /// The principal's groups that are granted `verb` by group-kind
    /// subjects, in binding order without duplicates.
    pub fn groups_granted(&self, principal: &Principal, verb: Verb) -> Vec<String> {
        let mut granted = Vec::new();
        for binding in self.permissions.iter().filter(|b| b.lists_verb(verb)) {
            for subject in &binding.subjects {
                if subject.kind == SubjectKind::Group
                    && principal.is_in_group(&subject.name)
                    && !granted.contains(&subject.name)
                {
                    granted.push(subject.name.clone());
                }
            }
        }
        granted
    }

    /// True iff the queue grants `verb` to the principal through any
    /// subject kind.
    pub fn grants(&self, principal: &Principal, verb: Verb) -> bool {
        self.grants_user(&principal.name, verb) || !self.groups_granted(principal, verb).is_empty()
    }
}

/// Queue field invariant violations.
#[derive(Debug, Error)]
pub enum InvalidQueue {
    #[error("queue name must not be empty")]
    EmptyName,

    #[error("priority factor must be positive, got {0}")]
    NonPositivePriorityFactor(f64),

    #[error("resource limit for {resource} must be a fraction in (0, 1], got {fraction}")]
    BadResourceLimit { resource: String, fraction: f64 },
}

/// An active job set within a queue, derived from stored jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSetInfo {
    pub job_set_id: String,
    pub job_count: usize,
}

crate::test_builder! {
    pub struct QueueBuilder for Queue = Queue::named("test-queue", 1.0);
    into { name: String }
    raw {
        priority_factor: f64,
        user_owners: Vec<String>,
        group_owners: Vec<String>,
        resource_limits: BTreeMap<String, f64>,
        permissions: Vec<PermissionBinding>,
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
