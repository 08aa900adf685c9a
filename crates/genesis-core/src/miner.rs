//! Nonce search over a genesis header.
//!
//! [`Miner`] walks a nonce range one step at a time, rewriting only the
//! trailing nonce bytes of its header buffer. [`mine_parallel`] splits the
//! nonce space into disjoint ranges and races one miner per worker.

use core::fmt;
use core::ops::RangeInclusive;
use std::time::Instant;

use log::info;
use primitive_types::U256;

use crate::block::HeaderBuf;
use crate::difficulty::hash_meets_target;
use crate::error::{GenesisError, Result};
use crate::hash::{Digests, HashEngine};

/// A throughput report is produced whenever `nonce % REPORT_INTERVAL == REPORT_INTERVAL - 1`.
pub const REPORT_INTERVAL: u32 = 1_000_000;

/// Size of the full 32-bit nonce space.
pub const NONCE_SPACE: u64 = 1 << 32;

const UNITS: &[&str] = &["H/s", "kH/s", "MH/s", "GH/s", "TH/s", "PH/s"];

/// Hashes per second, formatted with SI prefixes.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct HashRate(pub f64);

impl fmt::Display for HashRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rate = self.0;
        let mut unit = 0;
        while rate >= 1000.0 && unit < UNITS.len() - 1 {
            rate /= 1000.0;
            unit += 1;
        }
        write!(f, "{:.2} {}", rate, UNITS[unit])
    }
}

/// Periodic throughput observation. Has no effect on the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashRateReport {
    /// Nonce at which the report was taken.
    pub nonce: u32,
    /// Hash rate since the previous report.
    pub hash_rate: HashRate,
    /// Hours needed to try every nonce of the search space at this rate.
    pub estimated_hours: f64,
}

impl HashRateReport {
    fn new(nonce: u32, hashes: u64, elapsed_secs: f64, space: u64) -> Self {
        let rate = hashes as f64 / elapsed_secs.max(1e-9);
        HashRateReport {
            nonce,
            hash_rate: HashRate(rate),
            estimated_hours: space as f64 / rate / 3600.0,
        }
    }
}

impl fmt::Display for HashRateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, estimate: {:.1} h", self.hash_rate, self.estimated_hours)
    }
}

#[derive(Debug)]
struct ThroughputMeter {
    last_report: Instant,
    hashes_since: u64,
    space: u64,
}

impl ThroughputMeter {
    fn new(space: u64) -> Self {
        ThroughputMeter {
            last_report: Instant::now(),
            hashes_since: 0,
            space,
        }
    }

    fn observe(&mut self, nonce: u32) -> Option<HashRateReport> {
        self.hashes_since += 1;
        if nonce % REPORT_INTERVAL != REPORT_INTERVAL - 1 {
            return None;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_report).as_secs_f64();
        let report = HashRateReport::new(nonce, self.hashes_since, elapsed, self.space);
        self.last_report = now;
        self.hashes_since = 0;
        Some(report)
    }
}

/// A header whose proof-of-work digest satisfies the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningResult {
    /// The winning nonce.
    pub nonce: u32,
    /// The header with the winning nonce in place.
    pub header: HeaderBuf,
    /// Block hash and proof-of-work digest (display order).
    pub digests: Digests,
    /// The digest reported as the genesis hash (display order).
    pub winning_hash: [u8; 32],
    /// Number of hashes computed to find it.
    pub hashes: u64,
}

/// Search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinerState {
    /// The next nonce to try.
    Searching { nonce: u32 },
    /// Terminal.
    Found(MiningResult),
}

/// Sequential nonce search over an owned header buffer.
#[derive(Debug)]
pub struct Miner {
    engine: HashEngine,
    target: U256,
    header: HeaderBuf,
    range: RangeInclusive<u32>,
    state: MinerState,
    hashes: u64,
    meter: ThroughputMeter,
}

impl Miner {
    /// Search from `start_nonce` up to `u32::MAX`.
    ///
    /// Throughput estimates cover the full 32-bit nonce space.
    pub fn new(engine: HashEngine, header: HeaderBuf, target: U256, start_nonce: u32) -> Self {
        Self::build(engine, header, target, start_nonce..=u32::MAX, NONCE_SPACE)
    }

    /// Search only the given nonce range.
    ///
    /// Throughput estimates cover this range only.
    pub fn with_range(
        engine: HashEngine,
        header: HeaderBuf,
        target: U256,
        range: RangeInclusive<u32>,
    ) -> Self {
        let space = if range.is_empty() {
            0
        } else {
            u64::from(*range.end() - *range.start()) + 1
        };
        Self::build(engine, header, target, range, space)
    }

    fn build(
        engine: HashEngine,
        header: HeaderBuf,
        target: U256,
        range: RangeInclusive<u32>,
        space: u64,
    ) -> Self {
        Miner {
            engine,
            target,
            header,
            state: MinerState::Searching { nonce: *range.start() },
            range,
            hashes: 0,
            meter: ThroughputMeter::new(space),
        }
    }

    /// Current search state.
    pub fn state(&self) -> &MinerState {
        &self.state
    }

    /// Number of hashes computed so far.
    pub fn hashes(&self) -> u64 {
        self.hashes
    }

    /// Try one nonce.
    ///
    /// Returns a throughput report when one is due. Once the state is
    /// `Found` further calls do nothing. Trying the last nonce of the range
    /// without success, or stepping an empty range, fails with
    /// [`GenesisError::NonceSpaceExhausted`].
    pub fn step(&mut self) -> Result<Option<HashRateReport>> {
        let nonce = match self.state {
            MinerState::Searching { nonce } => nonce,
            MinerState::Found(_) => return Ok(None),
        };
        if self.range.is_empty() {
            return Err(GenesisError::NonceSpaceExhausted {
                start: *self.range.start(),
            });
        }

        self.header.set_nonce(nonce);
        let digests = self.engine.digest(self.header.as_bytes())?;
        self.hashes += 1;
        let report = self.meter.observe(nonce);

        if hash_meets_target(&digests.pow, &self.target) {
            self.state = MinerState::Found(MiningResult {
                nonce,
                header: self.header,
                digests,
                winning_hash: digests.winning(self.engine.algorithm()),
                hashes: self.hashes,
            });
        } else if nonce >= *self.range.end() {
            return Err(GenesisError::NonceSpaceExhausted {
                start: *self.range.start(),
            });
        } else {
            self.state = MinerState::Searching { nonce: nonce + 1 };
        }

        Ok(report)
    }

    /// Search until a nonce is found, logging throughput reports.
    pub fn run(self) -> Result<MiningResult> {
        self.run_with(|report| info!("{report}"))
    }

    /// Search until a nonce is found, passing throughput reports to `observer`.
    pub fn run_with(mut self, mut observer: impl FnMut(&HashRateReport)) -> Result<MiningResult> {
        loop {
            if let MinerState::Found(result) = self.state {
                return Ok(result);
            }
            if let Some(report) = self.step()? {
                observer(&report);
            }
        }
    }
}

/// Split `[start, u32::MAX]` into at most `workers` disjoint contiguous ranges.
pub fn partition_nonces(start: u32, workers: usize) -> Vec<RangeInclusive<u32>> {
    let span = u64::from(u32::MAX - start) + 1;
    let workers = (workers.max(1) as u64).min(span);
    let chunk = span.div_ceil(workers);

    (0..workers)
        .map(|i| u64::from(start) + i * chunk)
        .take_while(|lo| *lo <= u64::from(u32::MAX))
        .map(|lo| {
            let hi = (lo + chunk - 1).min(u64::from(u32::MAX));
            lo as u32..=hi as u32
        })
        .collect()
}

#[cfg(feature = "parallel")]
pub use parallel::mine_parallel;

#[cfg(feature = "parallel")]
mod parallel {
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use log::debug;
    use rayon::prelude::*;

    use super::*;

    /// Nonces a worker tries between checks of the shared found-flag.
    const CANCEL_CHECK_INTERVAL: u64 = 4096;

    /// Search with `workers` threads, each owning a disjoint nonce range.
    ///
    /// The first worker to succeed raises a shared flag and the others stop
    /// at their next check. Which worker wins is not deterministic.
    pub fn mine_parallel(
        engine: &HashEngine,
        header: HeaderBuf,
        target: U256,
        start_nonce: u32,
        workers: usize,
    ) -> Result<MiningResult> {
        if workers <= 1 {
            return Miner::new(engine.clone(), header, target, start_nonce).run();
        }

        let ranges = partition_nonces(start_nonce, workers);
        info!("Searching with {} workers", ranges.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .thread_name(|index| format!("genesis-miner-{index}"))
            .build()
            .map_err(|e| GenesisError::WorkerPool(e.to_string()))?;

        let found = AtomicBool::new(false);
        let total_hashes = AtomicU64::new(0);

        let outcome = pool.install(|| {
            ranges
                .into_par_iter()
                .enumerate()
                .map(|(worker, range)| {
                    search_range(engine, header, target, range, worker, &found, &total_hashes)
                })
                .find_map_any(|outcome| match outcome {
                    Ok(Some(result)) => Some(Ok(result)),
                    Ok(None) => None,
                    Err(err) => Some(Err(err)),
                })
        });

        match outcome {
            Some(Ok(mut result)) => {
                result.hashes = total_hashes.load(Ordering::Relaxed);
                Ok(result)
            }
            Some(Err(err)) => Err(err),
            None => Err(GenesisError::NonceSpaceExhausted { start: start_nonce }),
        }
    }

    fn search_range(
        engine: &HashEngine,
        header: HeaderBuf,
        target: U256,
        range: RangeInclusive<u32>,
        worker: usize,
        found: &AtomicBool,
        total_hashes: &AtomicU64,
    ) -> Result<Option<MiningResult>> {
        debug!("worker {worker}: nonces {}..={}", range.start(), range.end());

        let mut miner = Miner::with_range(engine.clone(), header, target, range);
        let outcome = loop {
            if miner.hashes() % CANCEL_CHECK_INTERVAL == 0 && found.load(Ordering::Relaxed) {
                break Ok(None);
            }
            match miner.step() {
                Ok(Some(report)) => info!("worker {worker}: {report}"),
                Ok(None) => {}
                Err(GenesisError::NonceSpaceExhausted { .. }) => break Ok(None),
                Err(err) => {
                    found.store(true, Ordering::Relaxed);
                    break Err(err);
                }
            }
            if let MinerState::Found(result) = miner.state() {
                found.store(true, Ordering::Relaxed);
                break Ok(Some(*result));
            }
        };

        total_hashes.fetch_add(miner.hashes(), Ordering::Relaxed);
        outcome
    }
}
