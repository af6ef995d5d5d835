//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior, most
//! importantly the retry policies used when polling eventually consistent
//! state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Retry policy configurations
    #[serde(default)]
    pub retry_policies: RetryPoliciesConfig,
}

impl RuntimeConfig {
    /// Validate every configured policy
    pub fn validate(&self) -> Result<()> {
        self.retry_policies.validate()
    }
}

/// Retry policy configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Default retry policy
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

impl RetryPoliciesConfig {
    /// Resolve the policy for an operation, falling back to the default
    pub fn policy_for(&self, operation: &str) -> &RetryPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }

    /// Validate the default and every per-operation policy
    pub fn validate(&self) -> Result<()> {
        self.default.validate()?;
        for (name, policy) in &self.operations {
            policy.validate().map_err(|e| e.for_operation(name))?;
        }
        Ok(())
    }
}

/// Retry policy for an operation
///
/// Fixed delay between attempts: no backoff, no jitter. The worst case
/// suspension is `(max_attempts - 1) * delay_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_delay")]
    pub delay_ms: u64,
}

impl RetryPolicy {
    /// Create a validated policy
    pub fn new(max_attempts: u32, delay_ms: u64) -> Result<Self> {
        let policy = Self {
            max_attempts,
            delay_ms,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check the policy invariants
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_retry_policy(
                "max-attempts must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Delay between attempts
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Upper bound on time spent sleeping between attempts
    pub fn worst_case_delay(&self) -> Duration {
        self.delay()
            .saturating_mul(self.max_attempts.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    30
}
fn default_delay() -> u64 {
    1000 // 1 second
}
