//! # fixbox2d
//!
//! **Deterministic 2D Box Physics on Fixed-Point Arithmetic**
//!
//! A small rigid-body kernel for oriented boxes: separating-axis collision
//! with edge clipping, persistent contact arbiters with warm starting, and a
//! sequential-impulse solver, all on an I32F32 fixed-point scalar.
//!
//! ## Features
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`math`] | `Fix64` scalar, `Vec2`, `Mat22`, CORDIC trig, integer sqrt |
//! | [`body`] | Box bodies and stable `BodyHandle`s |
//! | [`collide`] | Box-box SAT with reference-face clipping (0..2 contacts) |
//! | [`arbiter`] | Per-pair contact persistence and impulse solving |
//! | [`world`] | Broad phase, integration, and the step loop |
//! | [`scene`] | Classic demo scenarios |
//!
//! ## Design Principles
//!
//! - **Deterministic**: no floats in the step, ordered containers only
//! - **No per-step allocation** once the arbiter set is warm
//! - **Per-world solver switches**: no global state
//!
//! ## Quick Start
//!
//! ```rust
//! use fixbox2d::prelude::*;
//!
//! let mut world = World::new(Vec2::from_int(0, -10), 10);
//! let ground = world.add(
//!     Body::new_static(Vec2::from_int(100, 20)).with_position(Vec2::from_int(0, -10)),
//! );
//! let block = world.add(
//!     Body::new(Vec2::from_int(1, 1), Fix64::from_int(200)).with_position(Vec2::from_int(0, 4)),
//! );
//!
//! let dt = Fix64::from_ratio(1, 60);
//! for _ in 0..120 {
//!     world.step(dt);
//! }
//!
//! assert!(world.body(block).unwrap().position.y < Fix64::from_int(4));
//! assert_eq!(world.body(ground).unwrap().position, Vec2::from_int(0, -10));
//! ```
//!
//! ## Solver Switches
//!
//! ```rust
//! use fixbox2d::{Scene, SolverConfig};
//!
//! let mut world = Scene::VerticalStack.build();
//! world.solver = SolverConfig {
//!     warm_starting: false,
//!     ..Default::default()
//! };
//! world.step(fixbox2d::Fix64::from_ratio(1, 60));
//! assert!(world.arbiter_count() > 0);
//! ```

#![warn(missing_docs)]

pub mod arbiter;
pub mod body;
pub mod collide;
pub mod config;
pub mod contact;
pub mod error;
pub mod math;
pub mod scene;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::arbiter::{Arbiter, ArbiterKey, ALLOWED_PENETRATION, BIAS_FACTOR};
    pub use crate::body::{Body, BodyHandle, DEFAULT_FRICTION};
    pub use crate::collide::collide;
    pub use crate::config::{SolverConfig, WorldConfig, MAX_ITERATIONS};
    pub use crate::contact::{Contact, Edge, FeaturePair, Manifold, MAX_POINTS};
    pub use crate::error::PhysicsError;
    pub use crate::math::{cross_sv, cross_vs, Fix64, Mat22, Vec2};
    pub use crate::scene::Scene;
    pub use crate::world::World;
}

// Re-export main types at crate root
pub use prelude::*;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_single_box_lands_on_ground() {
        let mut world = Scene::SingleBox.build();
        let dt = Fix64::from_ratio(1, 60);
        for _ in 0..180 {
            world.step(dt);
        }
        let block = world.bodies()[1];
        assert!(block.position.y.to_f64() < 1.0, "y = {}", block.position.y);
        assert!(block.position.y.to_f64() > 0.4, "y = {}", block.position.y);
        assert_eq!(world.arbiter_count(), 1);
    }

    #[test]
    fn test_every_scene_steps() {
        let dt = Fix64::from_ratio(1, 60);
        for scene in Scene::ALL {
            let mut world = scene.build();
            for _ in 0..10 {
                world.step(dt);
            }
            assert!(world.body_count() > 1, "{}", scene.name());
        }
    }
}
