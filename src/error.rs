//! Physics Error Types
//!
//! The solver itself is total over its numeric domain; these errors only come
//! out of the checked entry points (body lookup, validated registration,
//! strict stepping, configuration).

use thiserror::Error;

use crate::body::BodyHandle;
use crate::math::Fix64;

/// Unified error type for physics operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// Handle does not refer to a registered body.
    #[error("body handle {handle:?} out of range (count={count})")]
    InvalidBodyHandle {
        /// The handle that was provided
        handle: BodyHandle,
        /// Current number of bodies in the world
        count: usize,
    },

    /// A strict step was requested with a non-positive timestep.
    #[error("timestep must be positive, got {dt}")]
    InvalidTimestep {
        /// The rejected timestep
        dt: Fix64,
    },

    /// Invalid configuration parameter.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the invalid configuration
        reason: &'static str,
    },

    /// Body shape or material cannot be simulated.
    #[error("invalid body: {reason}")]
    InvalidBody {
        /// Description of the problem
        reason: &'static str,
    },
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PhysicsError::InvalidBodyHandle {
            handle: BodyHandle(5),
            count: 3,
        };
        let s = e.to_string();
        assert!(s.contains('5'), "Should contain handle: {s}");
        assert!(s.contains("count=3"), "Should contain count: {s}");
    }

    #[test]
    fn test_timestep_display() {
        let e = PhysicsError::InvalidTimestep {
            dt: Fix64::from_int(-1),
        };
        assert_eq!(e.to_string(), "timestep must be positive, got -1");
    }

    #[test]
    fn test_error_variants() {
        let e1 = PhysicsError::InvalidConfiguration {
            reason: "iterations must be at least 1",
        };
        let e2 = PhysicsError::InvalidBody {
            reason: "width components must be positive",
        };
        assert_ne!(e1, e2);
        assert!(e1.to_string().starts_with("invalid configuration"));
    }
}
