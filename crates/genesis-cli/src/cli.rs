// Command-line arguments and report printing

use std::path::PathBuf;

use clap::Parser;
use genesis_core::{format_difficulty, GenesisConfig, GenesisReport, Result, Solution};

#[derive(Debug, Parser)]
#[command(name = "genesis")]
#[command(about = "Build a genesis block and search for its proof-of-work nonce", long_about = None)]
pub struct Cli {
    /// The (unix) time when the genesis block is created
    #[arg(short, long)]
    pub time: Option<u32>,

    /// The pszTimestamp found in the coinbase of the genesis block
    #[arg(short = 'z', long)]
    pub timestamp: Option<String>,

    /// The first value of the nonce that will be incremented when searching the genesis hash
    #[arg(short, long)]
    pub nonce: Option<u32>,

    /// The PoW algorithm: [SHA256|scrypt|X11|X13|X15]
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// The pubkey found in the output script
    #[arg(short, long)]
    pub pubkey: Option<String>,

    /// The value in base units for the output (e.g. 5000000000 for 50 coins)
    #[arg(short, long)]
    pub value: Option<i64>,

    /// The target in compact representation (decimal or 0x-prefixed hex)
    #[arg(short, long, value_parser = parse_bits)]
    pub bits: Option<u32>,

    /// Read defaults from a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of search threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Merge flags over the configuration file (or the built-in defaults).
    pub fn to_config(&self) -> Result<GenesisConfig> {
        let mut config = match &self.config {
            Some(path) => GenesisConfig::from_json_file(path)?,
            None => GenesisConfig::default(),
        };

        if let Some(time) = self.time {
            config.time = Some(time);
        }
        if let Some(timestamp) = &self.timestamp {
            config.timestamp = timestamp.clone();
        }
        if let Some(nonce) = self.nonce {
            config.nonce = nonce;
        }
        if let Some(algorithm) = &self.algorithm {
            config.algorithm = algorithm.clone();
        }
        if let Some(pubkey) = &self.pubkey {
            config.pubkey = pubkey.clone();
        }
        if let Some(value) = self.value {
            config.value = value;
        }
        if let Some(bits) = self.bits {
            config.bits = Some(bits);
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }

        Ok(config)
    }
}

fn parse_bits(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid bits {s:?}: {e}"))
}

/// Block parameters shown before the search starts.
pub fn format_block_info(report: &GenesisReport) -> String {
    [
        format!("input script: {}", report.input_script),
        format!("algorithm: {}", report.algorithm),
        format!("merkle hash: {}", report.merkle_root),
        format!("pszTimestamp: {}", report.timestamp),
        format!("pubkey: {}", report.pubkey),
        format!("time: {}", report.time),
        format!("bits: {}", report.bits),
        format!("difficulty: {}", format_difficulty(report.difficulty)),
    ]
    .join("\n")
}

pub fn print_block_info(report: &GenesisReport) {
    println!("{}", format_block_info(report));
}

pub fn announce_found_genesis(solution: &Solution) {
    println!("genesis hash found!");
    println!("nonce: {}", solution.nonce);
    println!("genesis hash: {}", solution.genesis_hash);
}
