//! Genesis configuration and its one-time resolution.

use std::path::Path;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::difficulty::target_from_bits;
use crate::error::{GenesisError, Result};
use crate::script::{parse_pubkey, PUBKEY_SIZE};

/// Coinbase text of the Bitcoin genesis block.
pub const DEFAULT_TIMESTAMP: &str =
    "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";

/// Public key paid by the Bitcoin genesis coinbase.
pub const DEFAULT_PUBKEY: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

/// 50 coins in base units.
pub const DEFAULT_VALUE: i64 = 5_000_000_000;

/// Raw genesis parameters, as read from flags or a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenesisConfig {
    /// Unix time of the block; the current time when absent.
    pub time: Option<u32>,
    /// Text embedded in the coinbase input script.
    pub timestamp: String,
    /// First nonce tried by the search.
    pub nonce: u32,
    /// Algorithm name: SHA256, scrypt, X11, X13 or X15.
    pub algorithm: String,
    /// Hex-encoded 65-byte public key of the coinbase output.
    pub pubkey: String,
    /// Coinbase output value in base units.
    pub value: i64,
    /// Compact difficulty; defaults per algorithm when absent.
    pub bits: Option<u32>,
    /// Number of search workers; one when absent.
    pub threads: Option<usize>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        GenesisConfig {
            time: None,
            timestamp: DEFAULT_TIMESTAMP.to_string(),
            nonce: 0,
            algorithm: Algorithm::Sha256d.name().to_string(),
            pubkey: DEFAULT_PUBKEY.to_string(),
            value: DEFAULT_VALUE,
            bits: None,
            threads: None,
        }
    }
}

impl GenesisConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Validate the configuration and fill in per-algorithm defaults.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        let bits = self.bits.unwrap_or_else(|| algorithm.default_bits());
        let target = target_from_bits(bits)?;
        let pubkey = parse_pubkey(&self.pubkey)?;

        let threads = match self.threads {
            Some(0) => return Err(GenesisError::Config("threads must be at least 1".into())),
            Some(n) => n,
            None => 1,
        };

        Ok(ResolvedConfig {
            algorithm,
            time: self.time.unwrap_or_else(current_timestamp),
            timestamp: self.timestamp.clone(),
            nonce: self.nonce,
            pubkey,
            value: self.value,
            bits,
            target,
            threads,
        })
    }
}

/// Fully validated parameters of a genesis run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub algorithm: Algorithm,
    pub time: u32,
    pub timestamp: String,
    pub nonce: u32,
    pub pubkey: [u8; PUBKEY_SIZE],
    pub value: i64,
    pub bits: u32,
    pub target: U256,
    pub threads: usize,
}

/// Get the current Unix timestamp.
fn current_timestamp() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::decode_bits;

    #[test]
    fn test_default_resolution() {
        let resolved = GenesisConfig::default().resolve().unwrap();

        assert_eq!(resolved.algorithm, Algorithm::Sha256d);
        assert_eq!(resolved.bits, 0x1d00ffff);
        assert_eq!(resolved.target, decode_bits(0x1d00ffff));
        assert_eq!(resolved.nonce, 0);
        assert_eq!(resolved.value, 5_000_000_000);
        assert_eq!(resolved.threads, 1);
        assert_eq!(hex::encode(resolved.pubkey), DEFAULT_PUBKEY);
        assert!(resolved.time > 1_600_000_000);
    }

    #[test]
    fn test_bits_default_per_algorithm() {
        for (name, bits) in [("scrypt", 0x1e0ffff0), ("X11", 0x1e0ffff0), ("SHA256", 0x1d00ffff)] {
            let config = GenesisConfig {
                algorithm: name.to_string(),
                time: Some(1),
                ..GenesisConfig::default()
            };
            assert_eq!(config.resolve().unwrap().bits, bits, "{name}");
        }

        let explicit = GenesisConfig {
            algorithm: "scrypt".to_string(),
            bits: Some(0x207fffff),
            ..GenesisConfig::default()
        };
        assert_eq!(explicit.resolve().unwrap().bits, 0x207fffff);
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let unsupported = GenesisConfig {
            algorithm: "ethash".to_string(),
            ..GenesisConfig::default()
        };
        assert!(matches!(
            unsupported.resolve(),
            Err(GenesisError::UnsupportedAlgorithm(_))
        ));

        let short_key = GenesisConfig {
            pubkey: "04abcd".to_string(),
            ..GenesisConfig::default()
        };
        assert!(matches!(short_key.resolve(), Err(GenesisError::InvalidKeyLength(3))));

        let zero_target = GenesisConfig {
            bits: Some(0x1d000000),
            ..GenesisConfig::default()
        };
        assert!(matches!(zero_target.resolve(), Err(GenesisError::InvalidBits(_))));

        let no_threads = GenesisConfig {
            threads: Some(0),
            ..GenesisConfig::default()
        };
        assert!(matches!(no_threads.resolve(), Err(GenesisError::Config(_))));
    }

    #[test]
    fn test_json_partial_config() {
        let config: GenesisConfig =
            serde_json::from_str(r#"{"algorithm": "scrypt", "time": 1317972665, "nonce": 5}"#)
                .unwrap();

        assert_eq!(config.algorithm, "scrypt");
        assert_eq!(config.time, Some(1317972665));
        assert_eq!(config.nonce, 5);
        assert_eq!(config.timestamp, DEFAULT_TIMESTAMP);
        assert_eq!(config.bits, None);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let result = serde_json::from_str::<GenesisConfig>(r#"{"difficulty": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("genesis-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"bits": 545259519, "threads": 2}"#).unwrap();

        let config = GenesisConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.bits, Some(0x207fffff));
        assert_eq!(config.threads, Some(2));

        assert!(matches!(
            GenesisConfig::from_json_file(path),
            Err(GenesisError::Io(_))
        ));
    }
}
