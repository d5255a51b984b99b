//! Diff configuration.

use crate::errors::{ExError, Result, SchemaDiffError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tunables for one diff call
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// use schemadiff_core::DiffConfig;
///
/// let config = DiffConfig::from_json_str(r#"{"budget": {"max_steps": 10000}}"#).unwrap();
/// assert!(config.preprocess);
/// assert_eq!(config.budget.max_steps, Some(10000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Fix forced assignments before searching
    pub preprocess: bool,
    /// Cap on tied-optimal mappings kept; `None` keeps every tie
    pub max_tied_solutions: Option<usize>,
    pub budget: SearchBudget,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            preprocess: true,
            max_tied_solutions: None,
            budget: SearchBudget::default(),
        }
    }
}

impl DiffConfig {
    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    ///
    /// `Serialization` for malformed JSON, `InvalidConfig` for rejected values.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ExError> {
        let config: DiffConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `InvalidConfig` when a tie cap of zero is set.
    pub fn validate(&self) -> Result<()> {
        if self.max_tied_solutions == Some(0) {
            return Err(SchemaDiffError::InvalidConfig {
                reason: "max_tied_solutions must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_preprocess(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Keep at most `max` tied mappings and flag the rest as truncated
    pub fn with_max_tied_solutions(mut self, max: usize) -> Self {
        self.max_tied_solutions = Some(max);
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }
}

/// Search limits; `None` means unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum candidate assignments tried
    pub max_steps: Option<u64>,
    /// Wall-clock limit, polled every 64 steps
    pub time_limit_ms: Option<u64>,
}

impl SearchBudget {
    pub fn steps(max_steps: u64) -> Self {
        Self {
            max_steps: Some(max_steps),
            time_limit_ms: None,
        }
    }

    pub fn millis(time_limit_ms: u64) -> Self {
        Self {
            max_steps: None,
            time_limit_ms: Some(time_limit_ms),
        }
    }
}

/// Cooperative cancellation flag shared with the caller
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
