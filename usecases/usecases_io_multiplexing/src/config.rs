//! Configuration Module
//!
//! Provides the tunables of the select emulation and their environment overrides.

use entities_io_multiplexing::{TimeoutRounding, MAXIMUM_WAIT_OBJECTS};
use log::warn;

/// Environment variable selecting the [`ViolationPolicy`] (`abort` or `report`)
pub const ENV_VIOLATION_POLICY: &str = "SELECT_ON_VIOLATION";
/// Environment variable selecting the [`TimeoutRounding`] (`truncate` or `ceil`)
pub const ENV_TIMEOUT_ROUNDING: &str = "SELECT_TIMEOUT_ROUNDING";
/// Environment variable overriding the object capacity (`1..=64`)
pub const ENV_CAPACITY: &str = "SELECT_CAPACITY";

/// What to do when a caller breaks the select contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// Panic, mirroring a debugger break in the native runtime
    Abort,
    /// Return `SelectError::ContractViolation` to the caller
    #[default]
    Report,
}

/// Select emulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectConfig {
    /// Maximum number of objects (and descriptor slots) per call
    pub capacity: usize,
    /// Handling of contract violations
    pub violation_policy: ViolationPolicy,
    /// Mapping of sub-millisecond timeout remainders
    pub timeout_rounding: TimeoutRounding,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            capacity: MAXIMUM_WAIT_OBJECTS,
            violation_policy: ViolationPolicy::Report,
            timeout_rounding: TimeoutRounding::Truncate,
        }
    }
}

impl SelectConfig {
    /// Set the object capacity, clamped to `1..=MAXIMUM_WAIT_OBJECTS`
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.clamp(1, MAXIMUM_WAIT_OBJECTS);
        self
    }

    /// Set the violation policy
    pub fn with_violation_policy(mut self, policy: ViolationPolicy) -> Self {
        self.violation_policy = policy;
        self
    }

    /// Set the timeout rounding
    pub fn with_timeout_rounding(mut self, rounding: TimeoutRounding) -> Self {
        self.timeout_rounding = rounding;
        self
    }

    /// Build a configuration from the process environment
    ///
    /// Reads [`ENV_VIOLATION_POLICY`], [`ENV_TIMEOUT_ROUNDING`] and [`ENV_CAPACITY`].
    /// Unset variables keep their defaults; unrecognised values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value for a variable name, `None` if unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_VIOLATION_POLICY) {
            match value.trim().to_ascii_lowercase().as_str() {
                "abort" => config.violation_policy = ViolationPolicy::Abort,
                "report" => config.violation_policy = ViolationPolicy::Report,
                other => warn!("ignoring {}={:?}: expected abort or report", ENV_VIOLATION_POLICY, other),
            }
        }

        if let Some(value) = lookup(ENV_TIMEOUT_ROUNDING) {
            match value.trim().to_ascii_lowercase().as_str() {
                "truncate" => config.timeout_rounding = TimeoutRounding::Truncate,
                "ceil" => config.timeout_rounding = TimeoutRounding::Ceil,
                other => warn!("ignoring {}={:?}: expected truncate or ceil", ENV_TIMEOUT_ROUNDING, other),
            }
        }

        if let Some(value) = lookup(ENV_CAPACITY) {
            match value.trim().parse::<usize>() {
                Ok(capacity) => config = config.with_capacity(capacity),
                Err(_) => warn!("ignoring {}={:?}: not a number", ENV_CAPACITY, value),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default() {
        let config = SelectConfig::default();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.violation_policy, ViolationPolicy::Report);
        assert_eq!(config.timeout_rounding, TimeoutRounding::Truncate);
    }

    #[test]
    fn test_builders() {
        let config = SelectConfig::default()
            .with_capacity(8)
            .with_violation_policy(ViolationPolicy::Abort)
            .with_timeout_rounding(TimeoutRounding::Ceil);
        assert_eq!(config.capacity, 8);
        assert_eq!(config.violation_policy, ViolationPolicy::Abort);
        assert_eq!(config.timeout_rounding, TimeoutRounding::Ceil);
    }

    #[test]
    fn test_capacity_clamped() {
        assert_eq!(SelectConfig::default().with_capacity(0).capacity, 1);
        assert_eq!(SelectConfig::default().with_capacity(1000).capacity, 64);
    }

    #[test]
    fn test_from_lookup() {
        let config = SelectConfig::from_lookup(lookup_from(&[
            (ENV_VIOLATION_POLICY, "Abort"),
            (ENV_TIMEOUT_ROUNDING, " ceil "),
            (ENV_CAPACITY, "16"),
        ]));
        assert_eq!(config.violation_policy, ViolationPolicy::Abort);
        assert_eq!(config.timeout_rounding, TimeoutRounding::Ceil);
        assert_eq!(config.capacity, 16);
    }

    #[test]
    fn test_from_lookup_ignores_bad_values() {
        let config = SelectConfig::from_lookup(lookup_from(&[
            (ENV_VIOLATION_POLICY, "explode"),
            (ENV_TIMEOUT_ROUNDING, "round"),
            (ENV_CAPACITY, "many"),
        ]));
        assert_eq!(config, SelectConfig::default());
    }

    #[test]
    fn test_from_lookup_empty() {
        assert_eq!(SelectConfig::from_lookup(|_| None), SelectConfig::default());
    }
}
