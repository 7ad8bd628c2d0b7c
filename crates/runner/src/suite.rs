//! Entry sequence: guard, fixtures, preflight, measurement, report.

use std::process::ExitCode;

use tracing::{error, info};

use crate::alloc;
use crate::cases::{self, BenchCase};
use crate::config::{BenchConfig, ReportFormat};
use crate::error::HarnessError;
use crate::fixture::BenchContext;
use crate::guard::{self, BuildProfile};
use crate::report::{CaseMemory, MemoryReport};

/// Install the log subscriber used by the binaries. `RUST_LOG` overrides
/// the INFO default.
pub fn init_tracing() {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

/// Process entry point shared by the binary and the bench target.
pub fn main_entry() -> ExitCode {
    init_tracing();

    // Checked before anything else so a debug build always gets the
    // rebuild instruction, whatever the environment holds.
    if let Err(HarnessError::DebugBuild) = guard::check_release_mode(BuildProfile::current()) {
        guard::warn_debug_build();
        return ExitCode::from(1);
    }

    let result = BenchConfig::from_env().and_then(|config| enforce_release(&config, || run(&config)));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(HarnessError::DebugBuild) => {
            guard::warn_debug_build();
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run `body` only when the build profile allows benchmarking.
pub fn enforce_release<F>(config: &BenchConfig, body: F) -> Result<(), HarnessError>
where
    F: FnOnce() -> Result<(), HarnessError>,
{
    guard::check_release_mode(config.build_profile)?;
    body()
}

/// Allocation figures for one case. A failing run ends the pass with the
/// case's error instead of being averaged in.
pub fn measure_case(
    case: &BenchCase,
    ctx: &BenchContext,
    iterations: u32,
) -> Result<CaseMemory, HarnessError> {
    let mut failure = None;
    let stats = alloc::measure(iterations, || {
        if failure.is_none() {
            if let Err(e) = case.run(ctx) {
                failure = Some(e);
            }
        }
    });
    match failure {
        Some(source) => Err(HarnessError::CaseFailed { case: case.name(), source }),
        None => Ok(CaseMemory::new(case.name(), stats)),
    }
}

/// Build fixtures, check every case, measure, and report.
pub fn run(config: &BenchConfig) -> Result<(), HarnessError> {
    info!("Initializing fixtures");
    let ctx = BenchContext::initialize()?;
    for fixture in ctx.fixtures() {
        info!("{:<20} {}", fixture.kind().as_str(), fixture.scheme().describe());
    }

    let mut report = MemoryReport::new(config, &ctx);
    for case in BenchCase::all() {
        case.preflight(&ctx)?;
        if config.memory_diagnoser {
            report.add(measure_case(&case, &ctx, config.alloc_iterations)?);
        }
    }
    if config.memory_diagnoser && !alloc::is_installed() {
        tracing::warn!("Counting allocator not installed; allocation figures unavailable");
    }

    let mut criterion = config.criterion();
    cases::register(&mut criterion, &ctx);
    criterion.final_summary();

    if config.memory_diagnoser {
        match config.report_format {
            ReportFormat::Text => println!("{}", report.to_text()),
            ReportFormat::Json => println!("{}", report.to_json()?),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::CaseKind;
    use crate::fixture::SchemeKind;
    use std::cell::Cell;

    fn config(build_profile: BuildProfile) -> BenchConfig {
        let mut config = BenchConfig::from_lookup(|_| None).unwrap();
        config.build_profile = build_profile;
        config
    }

    #[test]
    fn test_debug_build_skips_body() {
        let ran = Cell::new(false);
        let result = enforce_release(&config(BuildProfile::Debug), || {
            ran.set(true);
            Ok(())
        });
        assert!(matches!(result, Err(HarnessError::DebugBuild)));
        assert!(!ran.get());
    }

    #[test]
    fn test_release_build_runs_body() {
        let ran = Cell::new(false);
        enforce_release(&config(BuildProfile::Release), || {
            ran.set(true);
            Ok(())
        })
        .unwrap();
        assert!(ran.get());
    }

    #[test]
    fn test_body_errors_propagate() {
        let result = enforce_release(&config(BuildProfile::Release), || {
            Err(HarnessError::Config("boom".to_string()))
        });
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_measure_case_reports_case_name() {
        let ctx = BenchContext::initialize().unwrap();
        let case = BenchCase { scheme: SchemeKind::Bcrypt, kind: CaseKind::Verify };
        let memory = measure_case(&case, &ctx, 1).unwrap();
        assert_eq!(memory.case, "bcrypt_verify");
        // Unit tests run on the system allocator.
        assert_eq!(memory.allocated_bytes, None);
    }
}
