//! Optimistic concurrency expectation for versioned records.

use crate::error::RepositoryError;

/// Version expectation checked by a repository `save` against the stored
/// record.
///
/// A record that was never persisted is at version 0; the store bumps the
/// version on every successful save. Writers load a record, mutate it, and
/// save with `Exact(loaded_version)`; a concurrent writer in between makes
/// the check fail so no update is lost.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (idempotent writes, seeding).
    Any,
    /// Require the stored record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> Result<(), RepositoryError> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(RepositoryError::concurrency(format!(
                "expected {self:?}, found {actual}"
            )))
        }
    }
}
