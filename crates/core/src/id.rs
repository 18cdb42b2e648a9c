// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job id generation.
//!
//! Minted ids sort lexicographically in mint order within one process:
//! a fixed-width hex timestamp prefix carries the ordering, a
//! per-millisecond sequence breaks ties, and a random tail keeps ids
//! unique across processes.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique, time-ordered identifier for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Mints job ids. Implementations must return ids that are
/// monotonically non-decreasing in mint order and unique for the
/// lifetime of the process.
pub trait IdGen: Send + Sync {
    fn next_job_id(&self) -> JobId;
}

/// Production id generator.
///
/// Id layout: `{epoch_ms:012x}-{seq:04x}-{tail}`. The timestamp and
/// sequence prefix is fixed-width, so lexicographic order equals mint
/// order; the 8-character nanoid tail guards against collisions between
/// processes minting in the same millisecond.
pub struct TimeOrderedIdGen {
    last: Mutex<(u64, u16)>,
}

impl TimeOrderedIdGen {
    pub fn new() -> Self {
        Self { last: Mutex::new((0, 0)) }
    }

    fn next_ordinal(&self) -> (u64, u16) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let mut last = self.last.lock();
        if now > last.0 {
            *last = (now, 0);
        } else if last.1 == u16::MAX {
            // Sequence exhausted within one millisecond: borrow from the future.
            *last = (last.0 + 1, 0);
        } else {
            last.1 += 1;
        }
        *last
    }
}

impl Default for TimeOrderedIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen for TimeOrderedIdGen {
    fn next_job_id(&self) -> JobId {
        let (ms, seq) = self.next_ordinal();
        JobId(format!("{:012x}-{:04x}-{}", ms, seq, nanoid::nanoid!(8)))
    }
}

/// Deterministic generator for tests: `job-000001`, `job-000002`, …
#[cfg(any(test, feature = "test-support"))]
pub struct SeqIdGen {
    next: Mutex<u64>,
}

#[cfg(any(test, feature = "test-support"))]
impl SeqIdGen {
    pub fn new() -> Self {
        Self { next: Mutex::new(1) }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for SeqIdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl IdGen for SeqIdGen {
    fn next_job_id(&self) -> JobId {
        let mut next = self.next.lock();
        let id = JobId(format!("job-{:06}", *next));
        *next += 1;
        id
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
