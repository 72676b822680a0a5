//! Solver and World Configuration
//!
//! Solver switches are carried by each world; there is no global solver state.

use crate::error::{PhysicsError, Result};
use crate::math::{Fix64, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound accepted by [`WorldConfig::validate`]
pub const MAX_ITERATIONS: usize = 1024;

/// Solver fidelity switches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Clamp running impulse sums instead of per-iteration deltas
    pub accumulate_impulses: bool,
    /// Carry matched contact impulses over from the previous step
    pub warm_starting: bool,
    /// Feed penetration back into the normal impulse (Baumgarte bias)
    pub position_correction: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            accumulate_impulses: true,
            warm_starting: true,
            position_correction: true,
        }
    }
}

/// World configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Gravitational acceleration
    pub gravity: Vec2,
    /// Relaxation sweeps per step
    pub iterations: usize,
    /// Solver switches
    pub solver: SolverConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(Fix64::ZERO, Fix64::from_int(-10)),
            iterations: 10,
            solver: SolverConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Tighter contact resolution for tall stacks
    pub fn high_precision() -> Self {
        Self {
            iterations: 20,
            ..Default::default()
        }
    }

    /// Fewer sweeps per step (lower quality)
    pub fn fast() -> Self {
        Self {
            iterations: 4,
            ..Default::default()
        }
    }

    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set iteration count
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set solver switches
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Reject configurations the solver cannot make progress with.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "iterations must be at least 1",
            });
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(PhysicsError::InvalidConfiguration {
                reason: "iterations exceed MAX_ITERATIONS",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.gravity, Vec2::from_int(0, -10));
        assert_eq!(config.iterations, 10);
        assert!(config.solver.accumulate_impulses);
        assert!(config.solver.warm_starting);
        assert!(config.solver.position_correction);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(WorldConfig::high_precision().iterations > WorldConfig::default().iterations);
        assert!(WorldConfig::fast().iterations < WorldConfig::default().iterations);
    }

    #[test]
    fn test_builders() {
        let solver = SolverConfig {
            warm_starting: false,
            ..Default::default()
        };
        let config = WorldConfig::default()
            .with_gravity(Vec2::ZERO)
            .with_iterations(3)
            .with_solver(solver);
        assert_eq!(config.gravity, Vec2::ZERO);
        assert_eq!(config.iterations, 3);
        assert!(!config.solver.warm_starting);
    }

    #[test]
    fn test_validate_rejects_bad_iterations() {
        let zero = WorldConfig::default().with_iterations(0);
        assert!(matches!(
            zero.validate(),
            Err(PhysicsError::InvalidConfiguration { .. })
        ));
        let huge = WorldConfig::default().with_iterations(MAX_ITERATIONS + 1);
        assert!(huge.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let config = WorldConfig::fast();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: WorldConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }
}
