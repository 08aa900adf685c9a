//! End-to-end genesis block assembly and the result report.

use log::info;
use serde::{Deserialize, Serialize};

use crate::block::BlockHeader;
use crate::coinbase::CoinbaseTransaction;
use crate::config::ResolvedConfig;
use crate::difficulty::{bits_to_difficulty, target_to_hex};
use crate::error::Result;
use crate::hash::{hash_to_display_hex, HashBackends, HashEngine};
use crate::merkle::compute_merkle_root;
use crate::miner::{Miner, MiningResult};
use crate::script::{build_input_script, p2pk_script};

/// A genesis block ready for the nonce search.
///
/// Building it performs all validation and backend resolution, so a
/// successful build means the search can start.
#[derive(Debug, Clone)]
pub struct GenesisBlock {
    /// The resolved parameters.
    pub config: ResolvedConfig,
    /// The coinbase input script.
    pub input_script: Vec<u8>,
    /// The pay-to-pubkey output script.
    pub output_script: Vec<u8>,
    /// The coinbase transaction.
    pub coinbase: CoinbaseTransaction,
    /// Merkle root (internal byte order).
    pub merkle_root: [u8; 32],
    /// Header with the configured start nonce.
    pub header: BlockHeader,
    engine: HashEngine,
}

impl GenesisBlock {
    /// Assemble the coinbase and header and resolve the hash backend.
    pub fn build(config: ResolvedConfig, backends: &HashBackends) -> Result<Self> {
        let engine = HashEngine::new(config.algorithm, backends)?;

        let input_script = build_input_script(&config.timestamp)?;
        let output_script = p2pk_script(&config.pubkey);
        let coinbase = CoinbaseTransaction::new(&input_script, &output_script, config.value);
        let merkle_root = compute_merkle_root(&[coinbase.txid]);
        let header = BlockHeader::new(merkle_root, config.time, config.bits, config.nonce);

        info!("merkle root: {}", hash_to_display_hex(&merkle_root));

        Ok(GenesisBlock {
            config,
            input_script,
            output_script,
            coinbase,
            merkle_root,
            header,
            engine,
        })
    }

    /// Search for a nonce satisfying the target.
    pub fn mine(&self) -> Result<MiningResult> {
        info!(
            "Searching for genesis hash from nonce {} ({})",
            self.config.nonce, self.config.algorithm
        );

        let header = self.header.serialize();
        let result = if self.config.threads > 1 {
            self.mine_parallel(header)?
        } else {
            Miner::new(self.engine.clone(), header, self.config.target, self.config.nonce).run()?
        };

        info!("genesis hash found after {} hashes", result.hashes);
        Ok(result)
    }

    #[cfg(feature = "parallel")]
    fn mine_parallel(&self, header: crate::block::HeaderBuf) -> Result<MiningResult> {
        crate::miner::mine_parallel(
            &self.engine,
            header,
            self.config.target,
            self.config.nonce,
            self.config.threads,
        )
    }

    #[cfg(not(feature = "parallel"))]
    fn mine_parallel(&self, header: crate::block::HeaderBuf) -> Result<MiningResult> {
        log::warn!("built without the parallel feature, searching on one thread");
        Miner::new(self.engine.clone(), header, self.config.target, self.config.nonce).run()
    }

    /// Describe the block, and the solution when one is given.
    pub fn report(&self, result: Option<&MiningResult>) -> GenesisReport {
        GenesisReport {
            algorithm: self.config.algorithm.name().to_string(),
            merkle_root: hash_to_display_hex(&self.merkle_root),
            timestamp: self.config.timestamp.clone(),
            pubkey: hex::encode(self.config.pubkey),
            time: self.config.time,
            bits: format!("{:#x}", self.config.bits),
            target: target_to_hex(&self.config.target),
            difficulty: bits_to_difficulty(self.config.bits),
            input_script: hex::encode(&self.input_script),
            coinbase_tx: hex::encode(&self.coinbase.raw_tx),
            solution: result.map(|result| Solution {
                nonce: result.nonce,
                genesis_hash: hex::encode(result.winning_hash),
                block_hash: hex::encode(result.digests.sha256d),
                header: hex::encode(result.header.as_bytes()),
                hashes: result.hashes,
            }),
        }
    }
}

/// Human- and machine-readable description of a genesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenesisReport {
    pub algorithm: String,
    /// Merkle root in display order.
    pub merkle_root: String,
    pub timestamp: String,
    pub pubkey: String,
    pub time: u32,
    /// Compact bits as `0x…`.
    pub bits: String,
    pub target: String,
    pub difficulty: f64,
    pub input_script: String,
    pub coinbase_tx: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Solution>,
}

/// The winning nonce and the hashes it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub nonce: u32,
    /// Proof-of-work digest for scrypt and the X-family, block hash for SHA256d.
    pub genesis_hash: String,
    /// Double SHA256 of the header, display order.
    pub block_hash: String,
    /// Serialized 80-byte header.
    pub header: String,
    pub hashes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::config::GenesisConfig;
    use crate::error::GenesisError;

    const BITCOIN_NONCE: u32 = 2083236893;
    const LITECOIN_NONCE: u32 = 2084524493;

    fn bitcoin_config(nonce: u32) -> GenesisConfig {
        GenesisConfig {
            time: Some(1231006505),
            nonce,
            ..GenesisConfig::default()
        }
    }

    fn litecoin_config(nonce: u32) -> GenesisConfig {
        GenesisConfig {
            time: Some(1317972665),
            timestamp: "NY Times 05/Oct/2011 Steve Jobs, Apple\u{2019}s Visionary, Dies at 56".to_string(),
            nonce,
            algorithm: "scrypt".to_string(),
            pubkey: "040184710fa689ad5023690c80f3a49c8f13f8d45b8c857fbcbc8bc4a8e4d3eb4b10f4d4604fa08dce601aaf0f470216fe1b51850b4acf21b179c45070ac7b03a9".to_string(),
            ..GenesisConfig::default()
        }
    }

    fn build(config: GenesisConfig) -> GenesisBlock {
        GenesisBlock::build(config.resolve().unwrap(), &HashBackends::new()).unwrap()
    }

    #[test]
    fn test_bitcoin_genesis_block() {
        let genesis = build(bitcoin_config(BITCOIN_NONCE - 1_000));
        assert_eq!(
            hash_to_display_hex(&genesis.merkle_root),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );

        let result = genesis.mine().unwrap();
        assert_eq!(result.nonce, BITCOIN_NONCE);
        assert_eq!(result.hashes, 1_001);
        assert_eq!(
            hex::encode(result.winning_hash),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
        assert_eq!(result.winning_hash, result.digests.sha256d);
    }

    #[test]
    fn test_litecoin_genesis_block() {
        let genesis = build(litecoin_config(LITECOIN_NONCE - 10));
        assert_eq!(
            hash_to_display_hex(&genesis.merkle_root),
            "97ddfbbae6be97fd6cdf3e7ca13232a3afff2353e29badfab7f73011edd4ced9"
        );
        assert_eq!(genesis.config.bits, 0x1e0ffff0);

        let result = genesis.mine().unwrap();
        assert_eq!(result.nonce, LITECOIN_NONCE);
        assert_eq!(
            hex::encode(result.digests.sha256d),
            "12a765e31ffd4059bada1e25190f6e98c99d9714d334efa41a195a7e7e04bfe2"
        );
        assert_eq!(
            hex::encode(result.winning_hash),
            "0000050c34a64b415b6b15b37f2216634b5b1669cb9a2e38d76f7213b0671e00"
        );
    }

    #[test]
    fn test_report_fields() {
        let genesis = build(bitcoin_config(BITCOIN_NONCE));
        let result = genesis.mine().unwrap();
        let report = genesis.report(Some(&result));

        assert_eq!(report.algorithm, "SHA256");
        assert_eq!(report.bits, "0x1d00ffff");
        assert_eq!(report.time, 1231006505);
        assert_eq!(report.difficulty, 1.0);
        assert_eq!(report.coinbase_tx.len(), 204 * 2);
        assert!(report.input_script.starts_with("04ffff001d010445"));

        let solution = report.solution.unwrap();
        assert_eq!(solution.nonce, BITCOIN_NONCE);
        assert_eq!(solution.genesis_hash, solution.block_hash);
        assert_eq!(solution.hashes, 1);
        assert!(solution.header.ends_with("29ab5f49ffff001d1dac2b7c"));
    }

    #[test]
    fn test_report_json_omits_missing_solution() {
        let genesis = build(bitcoin_config(0));
        let json = serde_json::to_value(genesis.report(None)).unwrap();

        assert_eq!(json["merkle_root"], "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b");
        assert!(json.get("solution").is_none());
    }

    #[test]
    fn test_missing_backend_fails_before_search() {
        let config = GenesisConfig {
            algorithm: "X11".to_string(),
            ..GenesisConfig::default()
        };
        let err = GenesisBlock::build(config.resolve().unwrap(), &HashBackends::new()).unwrap_err();
        assert!(matches!(err, GenesisError::MissingBackend(Algorithm::X11)));
    }

    #[test]
    fn test_oversized_timestamp_rejected() {
        let config = GenesisConfig {
            timestamp: "z".repeat(300),
            ..GenesisConfig::default()
        };
        let err = GenesisBlock::build(config.resolve().unwrap(), &HashBackends::new()).unwrap_err();
        assert!(matches!(err, GenesisError::ScriptTooLong(_)));
    }

    #[test]
    fn test_threads_use_parallel_search() {
        let config = GenesisConfig {
            bits: Some(0x207fffff),
            threads: Some(3),
            ..bitcoin_config(0)
        };
        let genesis = build(config);
        let result = genesis.mine().unwrap();

        let check = HashEngine::new(Algorithm::Sha256d, &HashBackends::new()).unwrap();
        let digests = check.digest(result.header.as_bytes()).unwrap();
        assert!(crate::difficulty::hash_meets_target(&digests.pow, &genesis.config.target));
    }
}
