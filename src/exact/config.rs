//! Exact solver options.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options passed through to the MIP engine.
///
/// # Examples
///
/// ```
/// use u_facility::exact::ExactConfig;
///
/// let config = ExactConfig::default().with_time_limit(30.0);
/// assert_eq!(config.time_limit, Some(30.0));
/// assert!(config.validate().is_ok());
/// assert!(ExactConfig::default().with_time_limit(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Wall-clock limit for the whole solve, in seconds. The second Max
    /// pass gets whatever the first left over.
    pub time_limit: Option<f64>,
    /// Forbid two facilities from serving each other.
    pub exclusive_facilities: bool,
}

impl ExactConfig {
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_exclusive_facilities(mut self, exclusive: bool) -> Self {
        self.exclusive_facilities = exclusive;
        self
    }

    /// Rejects a time limit that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        match self.time_limit {
            Some(t) if !(t.is_finite() && t > 0.0) => Err(Error::invalid_parameter(format!(
                "time limit must be positive, got {t}"
            ))),
            _ => Ok(()),
        }
    }
}
