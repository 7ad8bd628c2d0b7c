//! The nine benchmark cases: hash, verify, and verify-wrong for each scheme.

use std::hint::black_box;

use criterion::Criterion;
use hashbench_core::{EncodedHash, HashError};
use tracing::{debug, error};

use crate::error::HarnessError;
use crate::fixture::{BenchContext, SchemeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// Produce a new encoded hash of the credential.
    Hash,
    /// Verify the credential against the baseline.
    Verify,
    /// Verify the wrong credential against the baseline.
    VerifyWrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BenchCase {
    pub scheme: SchemeKind,
    pub kind: CaseKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutput {
    Hash(EncodedHash),
    Verified(bool),
}

impl BenchCase {
    pub fn all() -> Vec<BenchCase> {
        let mut cases = Vec::with_capacity(9);
        for kind in [CaseKind::Hash, CaseKind::Verify, CaseKind::VerifyWrong] {
            for scheme in SchemeKind::ALL {
                cases.push(BenchCase { scheme, kind });
            }
        }
        cases
    }

    pub fn name(&self) -> String {
        match self.kind {
            CaseKind::Hash => format!("{}_hash", self.scheme.as_str()),
            CaseKind::Verify => format!("{}_verify", self.scheme.as_str()),
            CaseKind::VerifyWrong => format!("{}_verify_wrong", self.scheme.as_str()),
        }
    }

    /// Verification result this case must produce, if any.
    pub fn expected(&self) -> Option<bool> {
        match self.kind {
            CaseKind::Hash => None,
            CaseKind::Verify => Some(true),
            CaseKind::VerifyWrong => Some(false),
        }
    }

    pub fn run(&self, ctx: &BenchContext) -> Result<CaseOutput, HashError> {
        let fixture = ctx.fixture(self.scheme);
        match self.kind {
            CaseKind::Hash => fixture.scheme().hash(ctx.credential()).map(CaseOutput::Hash),
            CaseKind::Verify => fixture
                .scheme()
                .verify(fixture.baseline(), ctx.credential())
                .map(CaseOutput::Verified),
            CaseKind::VerifyWrong => fixture
                .scheme()
                .verify(fixture.baseline(), ctx.wrong_credential())
                .map(CaseOutput::Verified),
        }
    }

    /// Run once outside of timing and check the outcome.
    pub fn preflight(&self, ctx: &BenchContext) -> Result<(), HarnessError> {
        let output = self.run(ctx).map_err(|source| HarnessError::CaseFailed {
            case: self.name(),
            source,
        })?;
        if let (Some(expected), CaseOutput::Verified(actual)) = (self.expected(), &output) {
            if expected != *actual {
                return Err(HarnessError::UnexpectedOutcome {
                    case: self.name(),
                    expected,
                    actual: *actual,
                });
            }
        }
        debug!("Preflight ok: {}", self.name());
        Ok(())
    }
}

/// Register every case with criterion, one group per scheme.
pub fn register(c: &mut Criterion, ctx: &BenchContext) {
    for scheme in SchemeKind::ALL {
        let mut group = c.benchmark_group(scheme.as_str());
        for case in BenchCase::all().into_iter().filter(|case| case.scheme == scheme) {
            let name = case.name();
            group.bench_function(name.as_str(), |b| {
                b.iter(|| match case.run(ctx) {
                    Ok(output) => black_box(output),
                    Err(e) => fail_case(&name, e),
                })
            });
        }
        group.finish();
    }
}

/// A case failing mid-measurement ends the run; a partial sample set is
/// not a valid measurement.
fn fail_case(name: &str, source: HashError) -> ! {
    error!("{}", HarnessError::CaseFailed { case: name.to_string(), source });
    std::process::exit(1)
}
