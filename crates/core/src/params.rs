//! Cost parameters for the two hashing schemes.
//!
//! Both records are fixed at construction. The Argon2 record always describes
//! Argon2id (hybrid addressing) at version 0x13.

use std::num::NonZeroUsize;
use std::thread;

use argon2::{Algorithm, Params, Version};
use rust_argon2::{Config, ThreadMode, Variant};

use crate::error::HashError;

/// bcrypt work factor used by the suite (2^10 rounds).
pub const DEFAULT_WORK_FACTOR: u32 = 10;

/// Argon2 memory cost shared by both parameter sets: 19 MiB.
pub const ARGON2_MEMORY_COST_KIB: u32 = 19 * 1024;
pub const ARGON2_TIME_COST: u32 = 2;
pub const ARGON2_OUTPUT_LEN: usize = 32;

const MIN_WORK_FACTOR: u32 = 4;
const MAX_WORK_FACTOR: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptParams {
    work_factor: u32,
}

impl BcryptParams {
    pub fn new(work_factor: u32) -> Result<Self, HashError> {
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&work_factor) {
            return Err(HashError::InvalidParams(format!(
                "bcrypt work factor must be within {}..={}, got {}",
                MIN_WORK_FACTOR, MAX_WORK_FACTOR, work_factor
            )));
        }
        Ok(Self { work_factor })
    }

    pub fn work_factor(&self) -> u32 {
        self.work_factor
    }
}

impl Default for BcryptParams {
    fn default() -> Self {
        Self { work_factor: DEFAULT_WORK_FACTOR }
    }
}

/// Argon2id cost knobs.
///
/// `threads` is the degree of parallelism requested from the engine. It is
/// not part of the encoded hash; only `lanes` is. The engine runs lanes on
/// separate threads when `threads > 1`, so parallelism is capped by `lanes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argon2Params {
    time_cost: u32,
    memory_cost_kib: u32,
    lanes: u32,
    threads: u32,
    output_len: usize,
    params: Params,
}

impl Argon2Params {
    pub fn new(
        time_cost: u32,
        memory_cost_kib: u32,
        lanes: u32,
        threads: u32,
        output_len: usize,
    ) -> Result<Self, HashError> {
        if threads == 0 {
            return Err(HashError::InvalidParams(
                "Argon2 thread count must be at least 1".to_string(),
            ));
        }
        let params = Params::new(memory_cost_kib, time_cost, lanes, Some(output_len))
            .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            time_cost,
            memory_cost_kib,
            lanes,
            threads,
            output_len,
            params,
        })
    }

    /// OWASP-style baseline: t=2, m=19 MiB, one lane, one thread.
    pub fn recommended() -> Result<Self, HashError> {
        Self::new(ARGON2_TIME_COST, ARGON2_MEMORY_COST_KIB, 1, 1, ARGON2_OUTPUT_LEN)
    }

    /// Two lanes with one thread per available processing unit.
    ///
    /// Threads may exceed lanes on larger hosts; the values are kept as-is
    /// to measure oversubscription.
    pub fn custom() -> Result<Self, HashError> {
        Self::new(
            ARGON2_TIME_COST,
            ARGON2_MEMORY_COST_KIB,
            2,
            host_parallelism(),
            ARGON2_OUTPUT_LEN,
        )
    }

    /// Same costs with a different thread count.
    pub fn with_threads(&self, threads: u32) -> Result<Self, HashError> {
        Self::new(self.time_cost, self.memory_cost_kib, self.lanes, threads, self.output_len)
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn memory_cost_kib(&self) -> u32 {
        self.memory_cost_kib
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn algorithm(&self) -> Algorithm {
        Algorithm::Argon2id
    }

    pub fn version(&self) -> Version {
        Version::V0x13
    }

    pub(crate) fn library_params(&self) -> &Params {
        &self.params
    }

    pub fn thread_mode(&self) -> ThreadMode {
        ThreadMode::from_threads(self.threads)
    }

    /// Engine configuration computing the raw digest.
    pub fn engine_config(&self) -> Config<'static> {
        Config {
            variant: Variant::Argon2id,
            version: rust_argon2::Version::Version13,
            mem_cost: self.memory_cost_kib,
            time_cost: self.time_cost,
            lanes: self.lanes,
            thread_mode: self.thread_mode(),
            hash_length: self.output_len as u32,
            ..Config::default()
        }
    }
}

/// Number of processing units available to this process, at least 1.
pub fn host_parallelism() -> u32 {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .try_into()
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_params() {
        let params = Argon2Params::recommended().unwrap();
        assert_eq!(params.time_cost(), 2);
        assert_eq!(params.memory_cost_kib(), 19456);
        assert_eq!(params.lanes(), 1);
        assert_eq!(params.threads(), 1);
        assert_eq!(params.output_len(), 32);
        assert_eq!(params.algorithm(), Algorithm::Argon2id);
        assert_eq!(params.version(), Version::V0x13);
    }

    #[test]
    fn test_custom_params_scale_threads_not_lanes() {
        let params = Argon2Params::custom().unwrap();
        assert_eq!(params.lanes(), 2);
        assert_eq!(params.threads(), host_parallelism());
        assert_eq!(
            params.memory_cost_kib(),
            Argon2Params::recommended().unwrap().memory_cost_kib()
        );
    }

    #[test]
    fn test_threads_select_engine_mode() {
        let single = Argon2Params::new(1, 64, 2, 1, 32).unwrap();
        let multi = single.with_threads(2).unwrap();

        assert!(matches!(single.engine_config().thread_mode, ThreadMode::Sequential));
        assert!(matches!(multi.engine_config().thread_mode, ThreadMode::Parallel));
        assert_eq!(multi.engine_config().lanes, 2);
        assert_eq!(multi.engine_config().mem_cost, 64);
        assert_eq!(multi.engine_config().hash_length, 32);
    }

    #[test]
    fn test_host_parallelism_is_positive() {
        assert!(host_parallelism() >= 1);
    }

    #[test]
    fn test_rejects_zero_threads() {
        let err = Argon2Params::new(2, 19456, 1, 0, 32).unwrap_err();
        assert!(matches!(err, HashError::InvalidParams(_)));
    }

    #[test]
    fn test_rejects_memory_below_lane_minimum() {
        // Argon2 needs at least 8 KiB per lane.
        assert!(Argon2Params::new(2, 8, 4, 1, 32).is_err());
    }

    #[test]
    fn test_bcrypt_work_factor_bounds() {
        assert_eq!(BcryptParams::default().work_factor(), 10);
        assert!(BcryptParams::new(3).is_err());
        assert!(BcryptParams::new(32).is_err());
        assert_eq!(BcryptParams::new(12).unwrap().work_factor(), 12);
    }
}
