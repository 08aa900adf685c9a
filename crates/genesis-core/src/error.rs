//! Error taxonomy for genesis block construction and mining.

use thiserror::Error;

use crate::algorithm::Algorithm;

/// Errors raised while resolving configuration, encoding the block or
/// searching for a nonce.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The algorithm name is not one of the supported variants.
    #[error("Given algorithm must be one of: [SHA256|scrypt|X11|X13|X15], got {0:?}")]
    UnsupportedAlgorithm(String),

    /// No proof-of-work backend is registered for an externally hashed algorithm.
    #[error("Cannot run {0} algorithm: no hash backend registered")]
    MissingBackend(Algorithm),

    /// The public key is not valid hex.
    #[error("Invalid public key hex: {0}")]
    InvalidPubkeyHex(#[from] hex::FromHexError),

    /// The decoded public key is not an uncompressed 65-byte key.
    #[error("Public key must be 65 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The coinbase input script does not fit a single length byte.
    #[error("Coinbase script is {0} bytes, at most 255 are allowed")]
    ScriptTooLong(usize),

    /// The compact bits decode to an unusable target.
    #[error("Compact bits {0:#010x} do not encode a valid target")]
    InvalidBits(u32),

    /// Every nonce from the start value up to `u32::MAX` was tried.
    #[error("nonce space exhausted (search started at {start})")]
    NonceSpaceExhausted { start: u32 },

    /// The search worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    /// The scrypt parameters were rejected.
    #[error("scrypt: {0}")]
    Scrypt(String),

    /// A configuration value is malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = GenesisError> = core::result::Result<T, E>;
