//! Salt generation backed by the operating system's CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::HashError;

/// Salt length used for every Argon2 hash, in bytes.
pub const SALT_LEN: usize = 16;

/// A freshly drawn salt. Never reused across hash invocations.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Draw a new salt from the given source.
    pub fn generate(source: &dyn SaltSource) -> Result<Self, HashError> {
        let mut bytes = [0u8; SALT_LEN];
        source.fill(&mut bytes)?;
        Ok(Salt(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Salt(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(")?;
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        f.write_str(")")
    }
}

/// Source of cryptographically secure random bytes.
///
/// Implementations must be safe to call from several threads at once and
/// must report failure instead of returning predictable bytes.
pub trait SaltSource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), HashError>;
}

/// Default source: `OsRng`, stateless and shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), HashError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| HashError::Entropy(e.to_string()))
    }
}
