use crate::encoded::EncodedHash;
use crate::error::HashError;

/// A password hashing scheme under measurement.
///
/// `verify` returns `Ok(false)` on a mismatch. Errors are reserved for
/// hashes that cannot be parsed or library failures.
pub trait PasswordScheme: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// One-line summary of the cost parameters.
    fn describe(&self) -> String;

    fn hash(&self, password: &str) -> Result<EncodedHash, HashError>;

    fn verify(&self, encoded: &EncodedHash, candidate: &str) -> Result<bool, HashError>;
}
