// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission service configuration.
//!
//! Loaded from TOML; every knob has a default so an absent file yields a
//! working (if restrictive) configuration.

use flotilla_core::resources::ResourceList;
use flotilla_core::PermissionMap;
use k8s_openapi::api::core::v1::Toleration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Resolve the config path: `FLOTILLA_CONFIG` > `./flotilla.toml`.
pub fn config_path() -> PathBuf {
    std::env::var("FLOTILLA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("flotilla.toml"))
}

/// Bounds applied to every submitted pod spec.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingRules {
    /// Per-resource minimum request; submissions below are rejected.
    pub min_job_resources: ResourceList,
    /// Per-resource maximum request; submissions above are rejected.
    pub max_job_resources: ResourceList,
    /// Permitted priority class names. Empty allows any.
    pub allowed_priority_classes: Vec<String>,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            min_job_resources: ResourceList::new(),
            max_job_resources: ResourceList::new(),
            allowed_priority_classes: Vec::new(),
        }
    }
}

/// Configuration for the submit service facade.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Max jobs materialized per batch during set-scoped cancel.
    pub cancel_jobs_batch_size: usize,
    /// Whether submit may create a missing queue for callers holding
    /// `submit_any_jobs`.
    pub auto_create_queues: bool,
    /// Priority factor stamped on auto-created queues.
    pub default_priority_factor: f64,
    /// Resource defaults applied when a container specifies neither a
    /// request nor a limit for the resource.
    pub default_job_limits: ResourceList,
    /// Tolerations appended to every pod that does not already carry a
    /// matching one.
    pub default_job_tolerations: Vec<Toleration>,
    /// Ceiling on the serialized size of one pod spec.
    pub max_pod_spec_size_bytes: usize,
    /// Soft margin for batched cancel: when the remaining deadline drops
    /// below this, the operation returns what it has done.
    pub deadline_margin_ms: u64,
    pub scheduling: SchedulingRules,
    /// Global permission bindings (permission → scopes/groups/claims).
    pub permissions: PermissionMap,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            cancel_jobs_batch_size: 1_000,
            auto_create_queues: false,
            default_priority_factor: 1.0,
            default_job_limits: ResourceList::new(),
            default_job_tolerations: Vec::new(),
            max_pod_spec_size_bytes: 65_535,
            deadline_margin_ms: 1_000,
            scheduling: SchedulingRules::default(),
            permissions: PermissionMap::default(),
        }
    }
}

impl SubmitConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SubmitConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cancel_jobs_batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "cancel_jobs_batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.default_priority_factor > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_priority_factor",
                reason: format!("must be positive, got {}", self.default_priority_factor),
            });
        }
        if self.max_pod_spec_size_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_pod_spec_size_bytes",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn deadline_margin(&self) -> Duration {
        Duration::from_millis(self.deadline_margin_ms)
    }
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("invalid config: {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
