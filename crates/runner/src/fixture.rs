//! Shared, read-only benchmark state built once before measurement.

use std::sync::Arc;

use hashbench_core::{
    Argon2Params, Argon2Scheme, BcryptParams, BcryptScheme, EncodedHash, HashError,
    OsSaltSource, PasswordScheme, SaltSource,
};
use tracing::{debug, info};

use crate::error::HarnessError;

/// Credential hashed and verified by every case.
pub const CREDENTIAL: &str = "password123!";
/// Credential used by the rejection-path cases.
pub const WRONG_CREDENTIAL: &str = "wrong-password";

/// The three parameter sets under measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemeKind {
    Bcrypt,
    Argon2Recommended,
    Argon2Custom,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 3] = [
        SchemeKind::Bcrypt,
        SchemeKind::Argon2Recommended,
        SchemeKind::Argon2Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::Bcrypt => "bcrypt",
            SchemeKind::Argon2Recommended => "argon2_recommended",
            SchemeKind::Argon2Custom => "argon2_custom",
        }
    }

    /// Build the scheme for this parameter set.
    pub fn build(&self, salts: Arc<dyn SaltSource>) -> Result<Box<dyn PasswordScheme>, HashError> {
        Ok(match self {
            SchemeKind::Bcrypt => Box::new(BcryptScheme::new(BcryptParams::default())),
            SchemeKind::Argon2Recommended => Box::new(Argon2Scheme::with_salt_source(
                self.as_str(),
                Argon2Params::recommended()?,
                salts,
            )),
            SchemeKind::Argon2Custom => Box::new(Argon2Scheme::with_salt_source(
                self.as_str(),
                Argon2Params::custom()?,
                salts,
            )),
        })
    }
}

/// A scheme paired with the baseline hash its verification cases check.
pub struct Fixture {
    kind: SchemeKind,
    scheme: Box<dyn PasswordScheme>,
    baseline: EncodedHash,
}

impl Fixture {
    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    pub fn scheme(&self) -> &dyn PasswordScheme {
        self.scheme.as_ref()
    }

    pub fn baseline(&self) -> &EncodedHash {
        &self.baseline
    }
}

/// Immutable context passed by reference into every benchmark case.
pub struct BenchContext {
    credential: &'static str,
    wrong_credential: &'static str,
    fixtures: Vec<Fixture>,
}

impl BenchContext {
    /// Hash the credential once per scheme. Any failure aborts the run.
    pub fn initialize() -> Result<Self, HarnessError> {
        Self::initialize_with(Arc::new(OsSaltSource))
    }

    pub fn initialize_with(salts: Arc<dyn SaltSource>) -> Result<Self, HarnessError> {
        let mut fixtures = Vec::with_capacity(SchemeKind::ALL.len());
        for kind in SchemeKind::ALL {
            let fixture_error = |source| HarnessError::Fixture {
                scheme: kind.as_str(),
                source,
            };
            let scheme = kind.build(salts.clone()).map_err(fixture_error)?;
            let baseline = scheme.hash(CREDENTIAL).map_err(fixture_error)?;
            debug!("Baseline for {}: {}", kind.as_str(), baseline);
            fixtures.push(Fixture { kind, scheme, baseline });
        }
        info!("Fixtures initialized for {} schemes", fixtures.len());

        Ok(Self {
            credential: CREDENTIAL,
            wrong_credential: WRONG_CREDENTIAL,
            fixtures,
        })
    }

    pub fn credential(&self) -> &str {
        self.credential
    }

    pub fn wrong_credential(&self) -> &str {
        self.wrong_credential
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn fixture(&self, kind: SchemeKind) -> &Fixture {
        // initialize() builds one fixture per SchemeKind::ALL entry, in order.
        &self.fixtures[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbench_core::DecodedParams;

    struct BrokenSource;

    impl SaltSource for BrokenSource {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), HashError> {
            Err(HashError::Entropy("getrandom unavailable".to_string()))
        }
    }

    #[test]
    fn test_one_baseline_per_scheme() {
        let ctx = BenchContext::initialize().unwrap();
        assert_eq!(ctx.fixtures().len(), 3);
        for kind in SchemeKind::ALL {
            let fixture = ctx.fixture(kind);
            assert_eq!(fixture.kind(), kind);
            assert!(fixture.scheme().verify(fixture.baseline(), CREDENTIAL).unwrap());
            assert!(!fixture.scheme().verify(fixture.baseline(), WRONG_CREDENTIAL).unwrap());
        }
    }

    #[test]
    fn test_baselines_use_matching_params() {
        let ctx = BenchContext::initialize().unwrap();
        let bcrypt = ctx.fixture(SchemeKind::Bcrypt).baseline().decode().unwrap();
        assert_eq!(bcrypt, DecodedParams::Bcrypt { work_factor: 10 });

        for (kind, expected_lanes) in [
            (SchemeKind::Argon2Recommended, 1),
            (SchemeKind::Argon2Custom, 2),
        ] {
            match ctx.fixture(kind).baseline().decode().unwrap() {
                DecodedParams::Argon2 { time_cost, memory_cost_kib, lanes, output_len, .. } => {
                    assert_eq!(time_cost, 2);
                    assert_eq!(memory_cost_kib, 19456);
                    assert_eq!(lanes, expected_lanes);
                    assert_eq!(output_len, 32);
                }
                other => panic!("unexpected params for {:?}: {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_reinitialization_keeps_old_baselines_valid() {
        let first = BenchContext::initialize().unwrap();
        let second = BenchContext::initialize().unwrap();
        for kind in SchemeKind::ALL {
            let old = first.fixture(kind).baseline();
            assert_ne!(old, second.fixture(kind).baseline());
            assert!(second.fixture(kind).scheme().verify(old, CREDENTIAL).unwrap());
        }
    }

    #[test]
    fn test_entropy_failure_aborts_initialization() {
        let err = BenchContext::initialize_with(Arc::new(BrokenSource)).err().unwrap();
        match err {
            HarnessError::Fixture { scheme, source } => {
                assert_eq!(scheme, "argon2_recommended");
                assert!(matches!(source, HashError::Entropy(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
