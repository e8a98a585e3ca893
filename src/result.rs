//! Result enumeration for set/unset/migrate operations
//!
//! All fallible engine operations report one of these closed outcomes rather
//! than panicking. Success does not imply a storage write: `Defaulted` means
//! the write was skipped because the key is unset and the value equals its
//! default. [`Status::storage_updated`] separates "operation succeeded" from
//! "state changed", which batch restore relies on for change detection.

use core::fmt;

/// Outcome of a set/unset/migrate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Status {
    /// Value written to storage and cached
    Persisted,
    /// No-op: key unset and value equals its default
    Defaulted,
    /// Key removed from storage
    Removed,
    /// Engine is not open
    Disabled,
    /// Key is not registered
    UnknownKey,
    /// Value kind does not match the key's declared kind
    InvalidType,
    /// Value rejected by a validator
    InvalidValue,
    /// Storage write failed
    WriteFailed,
    /// Storage removal failed
    RemoveFailed,
}

impl Status {
    /// Operation succeeded (`Persisted`, `Defaulted` or `Removed`)
    pub fn is_success(self) -> bool {
        matches!(self, Status::Persisted | Status::Defaulted | Status::Removed)
    }

    /// Storage actually changed (`Persisted` or `Removed` only)
    pub fn storage_updated(self) -> bool {
        matches!(self, Status::Persisted | Status::Removed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Persisted => "persisted",
            Status::Defaulted => "defaulted",
            Status::Removed => "removed",
            Status::Disabled => "engine disabled",
            Status::UnknownKey => "unknown key",
            Status::InvalidType => "invalid type",
            Status::InvalidValue => "invalid value",
            Status::WriteFailed => "storage write failed",
            Status::RemoveFailed => "storage removal failed",
        };
        f.write_str(text)
    }
}
