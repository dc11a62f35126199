//! Chunk-byte-budget configuration for the out-of-core pipeline.

use crate::error::{MergeError, Result};
use std::env;

/// Environment variable holding the chunk size in MiB.
pub const CHUNK_MB_ENV: &str = "IMERGE_CHUNK_MB";

/// Default chunk byte budget when nothing is configured (1 MiB).
pub const DEFAULT_CHUNK_BUDGET: usize = 1024 * 1024;

/// Smallest viable split window: two 20-digit endpoints plus bracket, comma
/// and whitespace overhead.
pub const MIN_CHUNK_BUDGET: usize = 20 * 2 + 24;

/// Convert a whole-MiB count into a byte budget.
pub fn budget_from_mb(mb: usize) -> Result<usize> {
    if mb == 0 {
        return Err(MergeError::Config(
            "chunk size must be greater than zero MiB".into(),
        ));
    }
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| MergeError::Config(format!("chunk size {} MiB is out of range", mb)))
}

/// Read the chunk byte budget from the environment.
///
/// Unset means [`DEFAULT_CHUNK_BUDGET`]; a zero or unparsable value is a
/// configuration error, reported before any I/O starts.
pub fn chunk_budget_from_env() -> Result<usize> {
    match env::var(CHUNK_MB_ENV) {
        Ok(raw) => {
            let mb: usize = raw.trim().parse().map_err(|_| {
                MergeError::Config(format!(
                    "{} must be a whole number of MiB greater than zero, got {:?}",
                    CHUNK_MB_ENV, raw
                ))
            })?;
            budget_from_mb(mb)
        }
        Err(env::VarError::NotPresent) => Ok(DEFAULT_CHUNK_BUDGET),
        Err(env::VarError::NotUnicode(_)) => Err(MergeError::Config(format!(
            "{} is not valid unicode",
            CHUNK_MB_ENV
        ))),
    }
}

/// Resolve the split window for a requested budget.
///
/// Zero is a configuration error; budgets below [`MIN_CHUNK_BUDGET`] are
/// raised to it so a single interval token always fits the window.
pub fn effective_window(budget: usize) -> Result<usize> {
    if budget == 0 {
        return Err(MergeError::Config(
            "chunk byte budget must be greater than zero".into(),
        ));
    }
    Ok(budget.max(MIN_CHUNK_BUDGET))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_budget_from_mb() {
        assert_eq!(budget_from_mb(1).unwrap(), 1024 * 1024);
        assert_eq!(budget_from_mb(8).unwrap(), 8 * 1024 * 1024);
        assert!(budget_from_mb(0).is_err());
        assert!(budget_from_mb(usize::MAX).is_err());
    }

    #[test]
    fn test_effective_window() {
        assert!(effective_window(0).is_err());
        assert_eq!(effective_window(3).unwrap(), MIN_CHUNK_BUDGET);
        assert_eq!(effective_window(MIN_CHUNK_BUDGET).unwrap(), MIN_CHUNK_BUDGET);
        assert_eq!(effective_window(4096).unwrap(), 4096);
    }

    #[test]
    #[serial]
    fn test_env_unset_uses_default() {
        env::remove_var(CHUNK_MB_ENV);
        assert_eq!(chunk_budget_from_env().unwrap(), DEFAULT_CHUNK_BUDGET);
    }

    #[test]
    #[serial]
    fn test_env_override() {
        env::set_var(CHUNK_MB_ENV, "4");
        assert_eq!(chunk_budget_from_env().unwrap(), 4 * 1024 * 1024);
        env::remove_var(CHUNK_MB_ENV);
    }

    #[test]
    #[serial]
    fn test_env_rejects_bad_values() {
        for bad in ["0", "-1", "lots", ""] {
            env::set_var(CHUNK_MB_ENV, bad);
            assert!(
                matches!(chunk_budget_from_env(), Err(MergeError::Config(_))),
                "value {:?} should be rejected",
                bad
            );
        }
        env::remove_var(CHUNK_MB_ENV);
    }
}
