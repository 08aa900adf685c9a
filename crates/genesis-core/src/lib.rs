//! Genesis block construction and proof-of-work search.
//!
//! This crate provides pure Rust implementations of:
//! - Coinbase input/output script construction
//! - Genesis coinbase transaction and 80-byte header serialization
//! - Compact difficulty decoding to 256-bit targets
//! - SHA256d and scrypt header hashing, with injectable X11/X13/X15 backends
//! - Sequential and parallel nonce search with throughput reporting

pub mod algorithm;
pub mod block;
pub mod coinbase;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod genesis;
pub mod hash;
pub mod merkle;
pub mod miner;
pub mod script;

pub use algorithm::Algorithm;
pub use block::{BlockHeader, HeaderBuf};
pub use coinbase::{encode_transaction, CoinbaseTransaction};
pub use config::{GenesisConfig, ResolvedConfig};
pub use difficulty::{decode_bits, format_difficulty, hash_meets_target, target_from_bits};
pub use error::{GenesisError, Result};
pub use genesis::{GenesisBlock, GenesisReport, Solution};
pub use hash::{double_sha256, Digests, HashBackends, HashEngine, PowHasher};
pub use merkle::compute_merkle_root;
#[cfg(feature = "parallel")]
pub use miner::mine_parallel;
pub use miner::{HashRate, HashRateReport, Miner, MinerState, MiningResult};
pub use script::{build_input_script, build_output_script};
