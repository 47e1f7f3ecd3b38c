//! Counter configuration
//!
//! The only engine-wide parameter is epsilon. The frequency threshold is a
//! per-query argument and never lives here.

use crate::math;
use crate::traits::ConfigError;

/// Configuration shared by both lossy counting variants
///
/// # Example
///
/// ```
/// use lossycount::config::LossyConfig;
///
/// let cfg = LossyConfig::new(0.01).unwrap();
/// assert_eq!(cfg.bucket_width(), 100);
///
/// assert!(LossyConfig::new(0.0).is_err());
/// assert!(LossyConfig::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LossyConfig {
    /// Maximum tolerated frequency error, as a fraction of stream length
    epsilon: f64,
}

impl LossyConfig {
    /// Create a validated configuration
    pub fn new(epsilon: f64) -> Result<Self, ConfigError> {
        let cfg = Self { epsilon };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that epsilon lies in (0, 1)
    ///
    /// Deserialized configurations bypass [`LossyConfig::new`] and should be
    /// validated before use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.epsilon > 0.0 && self.epsilon < 1.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidEpsilon(self.epsilon))
        }
    }

    /// Maximum tolerated frequency error
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of stream items per bucket, `ceil(1/ε)`
    pub fn bucket_width(&self) -> u64 {
        bucket_width(self.epsilon)
    }
}

pub(crate) fn bucket_width(epsilon: f64) -> u64 {
    math::ceil(1.0 / epsilon) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_width() {
        assert_eq!(LossyConfig::new(0.5).unwrap().bucket_width(), 2);
        assert_eq!(LossyConfig::new(0.1).unwrap().bucket_width(), 10);
        assert_eq!(LossyConfig::new(0.3).unwrap().bucket_width(), 4);
        assert_eq!(LossyConfig::new(0.001).unwrap().bucket_width(), 1000);
        assert_eq!(LossyConfig::new(0.9).unwrap().bucket_width(), 2);
    }

    #[test]
    fn test_rejects_out_of_range() {
        for eps in [0.0, 1.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(LossyConfig::new(eps).is_err(), "accepted epsilon {}", eps);
        }
    }

    #[test]
    fn test_never_clamps() {
        match LossyConfig::new(2.0) {
            Err(ConfigError::InvalidEpsilon(eps)) => assert_eq!(eps, 2.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_config_is_validated() {
        let cfg: LossyConfig = serde_json::from_str(r#"{"epsilon":0.25}"#).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bucket_width(), 4);

        let bad: LossyConfig = serde_json::from_str(r#"{"epsilon":3.0}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
