//! Container options.
//!
//! Options can be built in code, read from the process environment, or (with
//! the `config` feature) parsed from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default resolution depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Environment variable prefix read by [`ContainerOptions::from_env`].
pub const ENV_PREFIX: &str = "TINY_DI";

/// Tuning knobs shared by a registry and every scope created from it.
///
/// # Examples
///
/// ```rust
/// use tiny_di::{ContainerOptions, Registry};
///
/// let options = ContainerOptions::default()
///     .with_max_depth(64)
///     .with_reject_captive_dependencies(true);
/// let registry = Registry::with_options(options);
/// assert_eq!(registry.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Longest resolution path allowed before failing with `DepthExceeded`.
    pub max_depth: usize,
    /// Fail singletons whose dependency graph reaches a scoped binding.
    pub reject_captive_dependencies: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        ContainerOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_captive_dependencies: false,
        }
    }
}

impl ContainerOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_reject_captive_dependencies(mut self, reject: bool) -> Self {
        self.reject_captive_dependencies = reject;
        self
    }

    /// Defaults overridden by `TINY_DI_MAX_DEPTH` and `TINY_DI_REJECT_CAPTIVE`.
    pub fn from_env() -> DiResult<Self> {
        Self::from_source(|name| env::var(format!("{}_{}", ENV_PREFIX, name)).ok())
    }

    fn from_source<F>(lookup: F) -> DiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = ContainerOptions::default();
        if let Some(raw) = lookup("MAX_DEPTH") {
            options.max_depth = raw.trim().parse().map_err(|_| {
                DiError::InvalidConfig(format!(
                    "{}_MAX_DEPTH is not a positive integer: {:?}",
                    ENV_PREFIX, raw
                ))
            })?;
        }
        if let Some(raw) = lookup("REJECT_CAPTIVE") {
            options.reject_captive_dependencies = parse_bool(&raw).ok_or_else(|| {
                DiError::InvalidConfig(format!(
                    "{}_REJECT_CAPTIVE is not a boolean: {:?}",
                    ENV_PREFIX, raw
                ))
            })?;
        }
        options.validate()
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let options: ContainerOptions =
            serde_json::from_str(json).map_err(|e| DiError::InvalidConfig(e.to_string()))?;
        options.validate()
    }

    fn validate(self) -> DiResult<Self> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidConfig("max_depth must be > 0".to_string()));
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
