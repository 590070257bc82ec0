//! Common error infrastructure for solver-core.
//!
//! Domain errors (`StoreError`, `CommandError`) live next to the code that
//! raises them. This module holds the classification shared by all of them.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later or with other input
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency, indicates a bug
/// - **Fatal**: the store cannot be used any more
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative command.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: actor slot out of range, non-finite vector
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - store cannot be constructed or continued.
    ///
    /// Examples: requested capacity outside the supported range
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all solver-core errors.
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait SolverError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable identifier for this error variant.
    ///
    /// Used for log fields, metrics and tests. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
