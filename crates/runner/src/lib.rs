//! Password hashing benchmark suite.
//!
//! Measures bcrypt and Argon2id (recommended and custom parameters) for
//! hashing, verification, and rejected verification, with criterion timing
//! and per-case allocation statistics.

pub mod alloc;
pub mod cases;
pub mod config;
pub mod error;
pub mod fixture;
pub mod guard;
pub mod report;
pub mod suite;

pub use cases::{BenchCase, CaseKind, CaseOutput};
pub use config::{BenchConfig, LaunchArgs, ReportFormat, RunProfile};
pub use error::HarnessError;
pub use fixture::{BenchContext, SchemeKind, CREDENTIAL, WRONG_CREDENTIAL};
pub use guard::BuildProfile;
