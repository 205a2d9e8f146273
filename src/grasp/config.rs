//! GRASP tuning parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of the GRASP outer loop.
///
/// # Examples
///
/// ```
/// use u_facility::grasp::GraspConfig;
///
/// let config = GraspConfig::default()
///     .with_alpha(0.3)
///     .with_iterations(50)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert!(GraspConfig::default().with_alpha(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraspConfig {
    /// Fraction of candidates kept in the restricted candidate list, in (0, 1].
    pub alpha: f64,
    /// Construction + local search rounds.
    pub iterations: usize,
    /// Consecutive rounds without improvement before stopping; 0 disables.
    pub early_stopping_rounds: usize,
    pub seed: u64,
    /// Applied swaps per local search before it gives up.
    pub max_local_search_moves: usize,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            iterations: 100,
            early_stopping_rounds: 10,
            seed: 42,
            max_local_search_moves: 10_000,
        }
    }
}

impl GraspConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_local_search_moves(mut self, moves: usize) -> Self {
        self.max_local_search_moves = moves;
        self
    }

    /// Rejects an alpha outside (0, 1] or zero iterations.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::invalid_parameter(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if self.iterations == 0 {
            return Err(Error::invalid_parameter("iterations must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GraspConfig::default();
        assert!((c.alpha - 0.2).abs() < 1e-10);
        assert_eq!(c.iterations, 100);
        assert_eq!(c.early_stopping_rounds, 10);
        assert_eq!(c.seed, 42);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_alpha() {
        assert!(GraspConfig::default().with_alpha(1.0).validate().is_ok());
        assert!(GraspConfig::default().with_alpha(1.5).validate().is_err());
        assert!(GraspConfig::default().with_alpha(-0.1).validate().is_err());
        assert!(GraspConfig::default().with_alpha(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_iterations() {
        let err = GraspConfig::default().with_iterations(0).validate();
        assert!(matches!(err, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_partial_json() {
        let c: GraspConfig = serde_json::from_str(r#"{"alpha": 0.5, "seed": 3}"#).expect("valid");
        assert!((c.alpha - 0.5).abs() < 1e-10);
        assert_eq!(c.seed, 3);
        assert_eq!(c.iterations, 100);
    }
}
