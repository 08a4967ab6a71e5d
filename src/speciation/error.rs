//! Speciation errors.
//!
//! Two families exist: invariant violations, which mean the caller broke
//! the specie lifecycle contract, and configuration errors, which are
//! rejected before any clustering happens. Neither is retried, since
//! speciation is deterministic in its inputs.

use super::types::SpecieId;

/// Errors raised by the speciation subsystem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeciationError {
    /// A mean statistic was requested from a specie with no members.
    ///
    /// Empty species are removed at the generation boundary, so reaching
    /// this means lifecycle management was skipped.
    #[error("specie {id} has no member genomes")]
    EmptySpecie {
        /// Id of the empty specie.
        id: SpecieId,
    },

    /// Specie indices do not form the contiguous range `[0, N)`.
    #[error("specie index out of sequence: expected {expected}, found {found}")]
    NonContiguousIdx {
        /// Index the specie at this position should carry.
        expected: usize,
        /// Index it actually carries.
        found: usize,
    },

    /// Specie ids are not strictly increasing in index order.
    #[error("specie id {found} follows id {previous}; ids must strictly increase")]
    IdOrder {
        /// Id of the preceding specie.
        previous: SpecieId,
        /// Offending id.
        found: SpecieId,
    },

    /// No specie with this id exists in the set (it may be extinct).
    #[error("unknown specie id {0}")]
    UnknownSpecie(SpecieId),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SpeciationError {
    /// Whether this error signals a broken lifecycle invariant rather than
    /// bad configuration.
    #[inline]
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }
}

/// Result alias for speciation operations.
pub type Result<T> = std::result::Result<T, SpeciationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SpeciationError::EmptySpecie { id: 3 }.is_invariant_violation());
        assert!(SpeciationError::NonContiguousIdx {
            expected: 1,
            found: 2
        }
        .is_invariant_violation());
        assert!(SpeciationError::UnknownSpecie(7).is_invariant_violation());
        assert!(!SpeciationError::InvalidConfig("x".into()).is_invariant_violation());
    }

    #[test]
    fn test_display() {
        let err = SpeciationError::EmptySpecie { id: 4 };
        assert_eq!(err.to_string(), "specie 4 has no member genomes");

        let err = SpeciationError::InvalidConfig("min_threshold must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: min_threshold must be positive"
        );
    }
}
