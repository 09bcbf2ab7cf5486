//! Domain errors shared across bounded contexts.

use std::fmt;

/// Domain-level errors raised by value objects and aggregate construction.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Aggregate invariant violated.
    InvariantViolation {
        /// Aggregate type.
        aggregate: String,
        /// Invariant that was violated.
        invariant: String,
        /// Current state description.
        state: String,
    },
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidValue`].
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::InvariantViolation {
                aggregate,
                invariant,
                state,
            } => {
                write!(
                    f,
                    "Invariant violation in {aggregate}: {invariant} (state: {state})"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Errors returned by repository and unit-of-work implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The store could not be reached or refused the write; safe to retry.
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// A unique constraint was violated.
    Conflict {
        /// Entity type.
        entity: String,
        /// Conflicting identifier.
        id: String,
    },

    /// The store is in an unusable state (e.g. a poisoned lock).
    Corrupted {
        /// Description of the failure.
        message: String,
    },
}

impl RepositoryError {
    /// Returns true if the operation may succeed when attempted again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { message } => write!(f, "Store unavailable: {message}"),
            Self::Conflict { entity, id } => write!(f, "{entity} already exists: {id}"),
            Self::Corrupted { message } => write!(f, "Store corrupted: {message}"),
        }
    }
}

impl std::error::Error for RepositoryError {}
