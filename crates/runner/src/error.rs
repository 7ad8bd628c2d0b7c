use hashbench_core::HashError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Benchmarks must not run in a debug build")]
    DebugBuild,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Fixture initialization failed for {scheme}: {source}")]
    Fixture {
        scheme: &'static str,
        #[source]
        source: HashError,
    },
    #[error("Benchmark case {case} failed: {source}")]
    CaseFailed {
        case: String,
        #[source]
        source: HashError,
    },
    #[error("Benchmark case {case} returned {actual}, expected {expected}")]
    UnexpectedOutcome {
        case: String,
        expected: bool,
        actual: bool,
    },
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}
