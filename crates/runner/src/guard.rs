//! Refuses to benchmark unoptimized builds.

use tracing::warn;

use crate::error::HarnessError;

/// Command operators should use instead of a debug run.
pub const RELEASE_HINT: &str = "cargo run --release -p hashbench";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    /// Profile this binary was compiled with, read once at startup.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildProfile::Debug
        } else {
            BuildProfile::Release
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }
}

pub fn check_release_mode(profile: BuildProfile) -> Result<(), HarnessError> {
    match profile {
        BuildProfile::Release => Ok(()),
        BuildProfile::Debug => Err(HarnessError::DebugBuild),
    }
}

/// Log the rebuild instructions for a rejected debug run.
pub fn warn_debug_build() {
    warn!("Program is running in a DEBUG build. Please run in RELEASE mode for benchmarking.");
    warn!("Use: {}", RELEASE_HINT);
    warn!("Exiting...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_passes() {
        assert!(check_release_mode(BuildProfile::Release).is_ok());
    }

    #[test]
    fn test_debug_is_rejected() {
        let err = check_release_mode(BuildProfile::Debug).unwrap_err();
        assert!(matches!(err, HarnessError::DebugBuild));
    }

    #[test]
    fn test_current_matches_debug_assertions() {
        let expected = if cfg!(debug_assertions) { "debug" } else { "release" };
        assert_eq!(BuildProfile::current().as_str(), expected);
    }
}
