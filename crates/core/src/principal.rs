// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Caller identity for one request.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name reported for requests that carry no identity.
pub const ANONYMOUS: &str = "anonymous";

/// The authenticated identity of a caller, immutable for the life of a
/// request.
///
/// `scopes` come from machine-client tokens, `groups` from directory
/// membership, and `claims` from custom identity providers; the
/// permission checker treats the three as independent allow channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    #[serde(default)]
    pub groups: HashSet<String>,
    #[serde(default)]
    pub scopes: HashSet<String>,
    #[serde(default)]
    pub claims: HashSet<String>,
}

impl Principal {
    /// A principal with a name and no group/scope/claim memberships.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: HashSet::new(),
            scopes: HashSet::new(),
            claims: HashSet::new(),
        }
    }

    /// The identity used when a request carries none.
    pub fn anonymous() -> Self {
        Self::named(ANONYMOUS)
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_claims<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims = claims.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

#[cfg(test)]
#[path = "principal_tests.rs"]
mod tests;
