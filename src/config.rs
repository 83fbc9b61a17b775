//! Election tunables (component K — ambient configuration).
//!
//! The original scatters these as module constants and CLI defaults
//! (`key_size=2048, t=3, n_shares=5` in
//! `original_source/backend/src/keygen.py`); this crate collects them
//! into one `serde`-deserializable struct so a collaborator's own
//! config loader (env, TOML, whatever) can populate it, and validates
//! the cross-field invariant the original never checks.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Minimum Paillier key size accepted by [`ElectionConfig::validate`].
/// Real elections use 2048+; tests use much smaller keys for speed,
/// which is why this is a soft floor rather than hardcoded into keygen.
pub const MIN_KEY_BITS: usize = 512;

/// Election-wide cryptographic parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Paillier modulus bit length
    pub key_bits: u32,
    /// number of trustee shares required to reconstruct the private key
    pub threshold: usize,
    /// total number of trustee shares issued
    pub num_shares: usize,
}

impl ElectionConfig {
    /// Check `threshold <= num_shares`, `threshold >= 1`, and
    /// `key_bits >= MIN_KEY_BITS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.threshold > self.num_shares {
            return Err(ConfigError::ThresholdExceedsShares {
                threshold: self.threshold,
                num_shares: self.num_shares,
            });
        }
        if (self.key_bits as usize) < MIN_KEY_BITS {
            return Err(ConfigError::KeyTooSmall {
                min: MIN_KEY_BITS,
                got: self.key_bits as usize,
            });
        }
        Ok(())
    }
}

impl Default for ElectionConfig {
    /// Mirrors `original_source/backend/src/keygen.py`'s defaults
    /// (`key_size=2048, t=3, n_shares=5`).
    fn default() -> Self {
        Self {
            key_bits: 2048,
            threshold: 3,
            num_shares: 5,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ElectionConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_exceeding_shares_rejected() {
        let cfg = ElectionConfig {
            key_bits: 2048,
            threshold: 6,
            num_shares: 5,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdExceedsShares { .. })
        ));
    }

    #[test]
    fn zero_threshold_rejected() {
        let cfg = ElectionConfig {
            key_bits: 2048,
            threshold: 0,
            num_shares: 5,
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroThreshold)));
    }

    #[test]
    fn tiny_key_size_rejected() {
        let cfg = ElectionConfig {
            key_bits: 64,
            threshold: 2,
            num_shares: 3,
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::KeyTooSmall { .. })));
    }
}
