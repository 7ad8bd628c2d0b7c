//! Run configuration loaded from the environment
//!
//! Variables:
//! - `HASHBENCH_PROFILE`: short | medium | long (default medium)
//! - `HASHBENCH_SAMPLE_SIZE`, `HASHBENCH_WARMUP_SECS`, `HASHBENCH_MEASUREMENT_SECS`:
//!   overrides of the profile's criterion settings
//! - `HASHBENCH_MEMORY_DIAGNOSER`: true | false (default true)
//! - `HASHBENCH_ALLOC_ITERATIONS`: runs per case for allocation stats (default 3)
//! - `HASHBENCH_REPORT_FORMAT`: text | json (default text)
//!
//! Command line: `hashbench [FILTER]` benchmarks the cases matching FILTER.
//! Criterion options are accepted together with `--bench`, which is what
//! `cargo bench` passes.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use regex::Regex;
use tracing::info;

use crate::error::HarnessError;
use crate::guard::BuildProfile;

/// Criterion refuses sample sizes below this.
const MIN_SAMPLE_SIZE: usize = 10;
const DEFAULT_ALLOC_ITERATIONS: u32 = 3;

/// Length of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunProfile {
    Short,
    #[default]
    Medium,
    Long,
}

impl RunProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunProfile::Short => "short",
            RunProfile::Medium => "medium",
            RunProfile::Long => "long",
        }
    }

    pub fn sample_size(&self) -> usize {
        match self {
            RunProfile::Short => 10,
            RunProfile::Medium => 15,
            RunProfile::Long => 100,
        }
    }

    pub fn warm_up_time(&self) -> Duration {
        match self {
            RunProfile::Short => Duration::from_secs(1),
            RunProfile::Medium => Duration::from_secs(3),
            RunProfile::Long => Duration::from_secs(5),
        }
    }

    pub fn measurement_time(&self) -> Duration {
        match self {
            RunProfile::Short => Duration::from_secs(3),
            RunProfile::Medium => Duration::from_secs(10),
            RunProfile::Long => Duration::from_secs(30),
        }
    }
}

impl FromStr for RunProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(RunProfile::Short),
            "medium" => Ok(RunProfile::Medium),
            "long" => Ok(RunProfile::Long),
            _ => Err(format!(
                "Invalid run profile '{}'. Valid options: short, medium, long",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format '{}'. Valid options: text, json", s)),
        }
    }
}

/// Criterion flags that keep it out of its one-shot test mode.
const MEASURING_FLAGS: [&str; 3] = ["--bench", "--list", "--test"];

/// How the command line reaches criterion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LaunchArgs {
    /// Plain run of the binary, optionally limited to cases matching a regex.
    #[default]
    Direct,
    Filtered(String),
    /// `cargo bench` or explicit criterion options; criterion parses them.
    Criterion,
}

impl LaunchArgs {
    pub fn from_args<I>(args: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        if args.iter().any(|a| a.starts_with('-')) {
            // Without one of these, criterion runs each case once untimed.
            if !args.iter().any(|a| MEASURING_FLAGS.contains(&a.as_str())) {
                return Err(HarnessError::Config(format!(
                    "criterion options require --bench, got: {}",
                    args.join(" ")
                )));
            }
            return Ok(LaunchArgs::Criterion);
        }

        match args.as_slice() {
            [] => Ok(LaunchArgs::Direct),
            [filter] => {
                Regex::new(filter).map_err(|e| {
                    HarnessError::Config(format!("Invalid case filter '{}': {}", filter, e))
                })?;
                Ok(LaunchArgs::Filtered(filter.clone()))
            }
            _ => Err(HarnessError::Config(format!(
                "expected at most one case filter, got: {}",
                args.join(" ")
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub build_profile: BuildProfile,
    pub profile: RunProfile,
    pub sample_size: usize,
    pub warm_up_time: Duration,
    pub measurement_time: Duration,
    /// Collect per-case allocation statistics
    pub memory_diagnoser: bool,
    pub alloc_iterations: u32,
    pub report_format: ReportFormat,
    pub launch: LaunchArgs,
}

impl BenchConfig {
    pub fn from_env() -> Result<Self, HarnessError> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.launch = LaunchArgs::from_args(env::args().skip(1))?;
        Ok(config)
    }

    /// Build the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let profile = match get("HASHBENCH_PROFILE") {
            Some(v) => v.trim().parse().map_err(HarnessError::Config)?,
            None => RunProfile::default(),
        };

        let sample_size = match get("HASHBENCH_SAMPLE_SIZE") {
            Some(v) => parse_number::<usize>("HASHBENCH_SAMPLE_SIZE", &v)?,
            None => profile.sample_size(),
        };
        if sample_size < MIN_SAMPLE_SIZE {
            return Err(HarnessError::Config(format!(
                "HASHBENCH_SAMPLE_SIZE must be at least {}, got {}",
                MIN_SAMPLE_SIZE, sample_size
            )));
        }

        let warm_up_time = match get("HASHBENCH_WARMUP_SECS") {
            Some(v) => Duration::from_secs(parse_number("HASHBENCH_WARMUP_SECS", &v)?),
            None => profile.warm_up_time(),
        };
        if warm_up_time.is_zero() {
            return Err(HarnessError::Config(
                "HASHBENCH_WARMUP_SECS must be greater than zero".to_string(),
            ));
        }
        let measurement_time = match get("HASHBENCH_MEASUREMENT_SECS") {
            Some(v) => Duration::from_secs(parse_number("HASHBENCH_MEASUREMENT_SECS", &v)?),
            None => profile.measurement_time(),
        };
        if measurement_time.is_zero() {
            return Err(HarnessError::Config(
                "HASHBENCH_MEASUREMENT_SECS must be greater than zero".to_string(),
            ));
        }

        let memory_diagnoser = match get("HASHBENCH_MEMORY_DIAGNOSER") {
            Some(v) => parse_bool("HASHBENCH_MEMORY_DIAGNOSER", &v)?,
            None => true,
        };

        let alloc_iterations = match get("HASHBENCH_ALLOC_ITERATIONS") {
            Some(v) => parse_number::<u32>("HASHBENCH_ALLOC_ITERATIONS", &v)?,
            None => DEFAULT_ALLOC_ITERATIONS,
        };
        if alloc_iterations == 0 {
            return Err(HarnessError::Config(
                "HASHBENCH_ALLOC_ITERATIONS must be at least 1".to_string(),
            ));
        }

        let report_format = match get("HASHBENCH_REPORT_FORMAT") {
            Some(v) => v.trim().parse().map_err(HarnessError::Config)?,
            None => ReportFormat::default(),
        };

        Ok(Self {
            build_profile: BuildProfile::current(),
            profile,
            sample_size,
            warm_up_time,
            measurement_time,
            memory_diagnoser,
            alloc_iterations,
            report_format,
            launch: LaunchArgs::default(),
        })
    }

    /// Criterion configured for this run, in-process and without plots.
    ///
    /// A direct run stays in criterion's measuring mode; only an explicit
    /// criterion command line is handed to `configure_from_args`.
    pub fn criterion(&self) -> Criterion {
        info!(
            "Run profile {}: {} samples, {:?} warm-up, {:?} measurement",
            self.profile.as_str(),
            self.sample_size,
            self.warm_up_time,
            self.measurement_time
        );
        let criterion = Criterion::default()
            .sample_size(self.sample_size)
            .warm_up_time(self.warm_up_time)
            .measurement_time(self.measurement_time)
            .without_plots();

        match &self.launch {
            LaunchArgs::Direct => criterion,
            LaunchArgs::Filtered(filter) => criterion.with_filter(filter.as_str()),
            LaunchArgs::Criterion => criterion.configure_from_args(),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, HarnessError> {
    value
        .trim()
        .parse()
        .map_err(|_| HarnessError::Config(format!("{} must be a number, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, HarnessError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(HarnessError::Config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<BenchConfig, HarnessError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BenchConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_use_medium_profile() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.profile, RunProfile::Medium);
        assert_eq!(config.sample_size, 15);
        assert_eq!(config.warm_up_time, Duration::from_secs(3));
        assert_eq!(config.measurement_time, Duration::from_secs(10));
        assert!(config.memory_diagnoser);
        assert_eq!(config.alloc_iterations, 3);
        assert_eq!(config.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_profile_and_overrides() {
        let config = config_from(&[
            ("HASHBENCH_PROFILE", "Long"),
            ("HASHBENCH_MEASUREMENT_SECS", "60"),
            ("HASHBENCH_MEMORY_DIAGNOSER", "off"),
            ("HASHBENCH_REPORT_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.profile, RunProfile::Long);
        assert_eq!(config.sample_size, 100);
        assert_eq!(config.measurement_time, Duration::from_secs(60));
        assert!(!config.memory_diagnoser);
        assert_eq!(config.report_format, ReportFormat::Json);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("HASHBENCH_PROFILE", "  ")]).unwrap();
        assert_eq!(config.profile, RunProfile::Medium);
    }

    #[test]
    fn test_unknown_profile_is_error() {
        let err = config_from(&[("HASHBENCH_PROFILE", "turbo")]).unwrap_err();
        assert!(matches!(err, HarnessError::Config(ref msg) if msg.contains("turbo")));
    }

    #[test]
    fn test_sample_size_floor() {
        assert!(config_from(&[("HASHBENCH_SAMPLE_SIZE", "5")]).is_err());
        assert!(config_from(&[("HASHBENCH_SAMPLE_SIZE", "ten")]).is_err());
        assert_eq!(config_from(&[("HASHBENCH_SAMPLE_SIZE", "20")]).unwrap().sample_size, 20);
    }

    #[test]
    fn test_zero_alloc_iterations_rejected() {
        assert!(config_from(&[("HASHBENCH_ALLOC_ITERATIONS", "0")]).is_err());
    }

    #[test]
    fn test_zero_warmup_rejected() {
        let err = config_from(&[("HASHBENCH_WARMUP_SECS", "0")]).unwrap_err();
        assert!(matches!(err, HarnessError::Config(ref msg) if msg.contains("WARMUP")));
        assert!(config_from(&[("HASHBENCH_MEASUREMENT_SECS", "0")]).is_err());
    }

    fn args(list: &[&str]) -> Result<LaunchArgs, HarnessError> {
        LaunchArgs::from_args(list.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_plain_run_stays_direct() {
        assert_eq!(args(&[]).unwrap(), LaunchArgs::Direct);
        assert_eq!(
            args(&["bcrypt_verify"]).unwrap(),
            LaunchArgs::Filtered("bcrypt_verify".to_string())
        );
    }

    #[test]
    fn test_cargo_bench_args_go_to_criterion() {
        assert_eq!(args(&["--bench"]).unwrap(), LaunchArgs::Criterion);
        assert_eq!(args(&["--bench", "argon2"]).unwrap(), LaunchArgs::Criterion);
        assert_eq!(args(&["--list"]).unwrap(), LaunchArgs::Criterion);
    }

    #[test]
    fn test_criterion_options_without_bench_rejected() {
        let err = args(&["--save-baseline", "main"]).unwrap_err();
        assert!(matches!(err, HarnessError::Config(ref msg) if msg.contains("--bench")));
    }

    #[test]
    fn test_bad_filter_rejected() {
        assert!(args(&["bcrypt_(verify"]).is_err());
        assert!(args(&["bcrypt", "argon2"]).is_err());
    }

    #[test]
    fn test_lookup_config_runs_direct() {
        assert_eq!(config_from(&[]).unwrap().launch, LaunchArgs::Direct);
    }
}
