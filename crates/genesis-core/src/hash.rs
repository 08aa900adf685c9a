//! Header hashing: SHA256 primitives and the proof-of-work engine.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::algorithm::Algorithm;
use crate::error::{GenesisError, Result};

/// scrypt cost parameter as log2(N); N = 1024.
pub const SCRYPT_LOG_N: u8 = 10;
/// scrypt block size parameter.
pub const SCRYPT_R: u32 = 1;
/// scrypt parallelization parameter.
pub const SCRYPT_P: u32 = 1;

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// This is used for block header hashing, transaction IDs, and merkle trees.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Reverse the byte order of a 32-byte array.
///
/// Hashes are displayed in the reverse of the order they are computed in.
#[inline]
pub fn reverse_bytes(bytes: &[u8; 32]) -> [u8; 32] {
    let mut reversed = *bytes;
    reversed.reverse();
    reversed
}

/// Convert a hash in internal order to its display format (reversed hex).
pub fn hash_to_display_hex(hash: &[u8; 32]) -> String {
    hex::encode(reverse_bytes(hash))
}

/// An externally supplied proof-of-work function.
///
/// Used for the X-family algorithms, whose implementations do not ship with
/// this crate. The returned digest is in raw output order; the engine
/// reverses it for comparison and display.
pub trait PowHasher: Send + Sync {
    fn pow_hash(&self, header: &[u8]) -> [u8; 32];
}

impl<F> PowHasher for F
where
    F: Fn(&[u8]) -> [u8; 32] + Send + Sync,
{
    fn pow_hash(&self, header: &[u8]) -> [u8; 32] {
        self(header)
    }
}

/// Registry of external proof-of-work backends.
#[derive(Clone, Default)]
pub struct HashBackends {
    backends: HashMap<Algorithm, Arc<dyn PowHasher>>,
}

impl HashBackends {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the backend for an algorithm, replacing any previous one.
    pub fn with_backend(mut self, algorithm: Algorithm, hasher: impl PowHasher + 'static) -> Self {
        self.backends.insert(algorithm, Arc::new(hasher));
        self
    }

    /// Look up the backend for an algorithm.
    pub fn get(&self, algorithm: Algorithm) -> Option<Arc<dyn PowHasher>> {
        self.backends.get(&algorithm).cloned()
    }
}

impl core::fmt::Debug for HashBackends {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.backends.keys()).finish()
    }
}

/// Both digests of one header, in display byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digests {
    /// reverse(SHA256(SHA256(header))), the block hash.
    pub sha256d: [u8; 32],
    /// The proof-of-work digest compared against the target.
    pub pow: [u8; 32],
}

impl Digests {
    /// The hash reported as the genesis hash.
    ///
    /// SHA256d chains report the block hash; the other algorithms report
    /// their proof-of-work digest.
    pub fn winning(&self, algorithm: Algorithm) -> [u8; 32] {
        match algorithm {
            Algorithm::Sha256d => self.sha256d,
            _ => self.pow,
        }
    }
}

#[derive(Clone)]
enum PowFunction {
    Sha256d,
    Scrypt(scrypt::Params),
    External(Arc<dyn PowHasher>),
}

/// Computes the block hash and proof-of-work digest of a header.
///
/// Backend resolution happens once in [`HashEngine::new`]; hashing itself
/// never dispatches on configuration.
#[derive(Clone)]
pub struct HashEngine {
    algorithm: Algorithm,
    pow: PowFunction,
}

impl HashEngine {
    /// Resolve the proof-of-work function for an algorithm.
    ///
    /// Fails with [`GenesisError::MissingBackend`] when an X-family algorithm
    /// has no registered backend.
    pub fn new(algorithm: Algorithm, backends: &HashBackends) -> Result<Self> {
        let pow = match algorithm {
            Algorithm::Sha256d => PowFunction::Sha256d,
            Algorithm::Scrypt => {
                let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32)
                    .map_err(|e| GenesisError::Scrypt(e.to_string()))?;
                PowFunction::Scrypt(params)
            }
            Algorithm::X11 | Algorithm::X13 | Algorithm::X15 => {
                let hasher = backends
                    .get(algorithm)
                    .ok_or(GenesisError::MissingBackend(algorithm))?;
                PowFunction::External(hasher)
            }
        };

        Ok(HashEngine { algorithm, pow })
    }

    /// The algorithm this engine hashes with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Hash a serialized header.
    pub fn digest(&self, header: &[u8]) -> Result<Digests> {
        let sha256d = reverse_bytes(&double_sha256(header));

        let pow = match &self.pow {
            PowFunction::Sha256d => sha256d,
            PowFunction::Scrypt(params) => {
                let mut output = [0u8; 32];
                scrypt::scrypt(header, header, params, &mut output)
                    .map_err(|e| GenesisError::Scrypt(e.to_string()))?;
                reverse_bytes(&output)
            }
            PowFunction::External(hasher) => reverse_bytes(&hasher.pow_hash(header)),
        };

        Ok(Digests { sha256d, pow })
    }
}

impl core::fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashEngine")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
