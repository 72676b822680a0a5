//! Rigid Box Bodies
//!
//! Plain mutable state for an oriented rectangle: pose, velocity, mass
//! properties, and the force/torque accumulated for the next step.
//!
//! A body with `inv_mass == 0` is immovable. The world never divides by a
//! body's mass, only multiplies by its inverse, so static bodies need no
//! special casing in the solver.

use crate::error::{PhysicsError, Result};
use crate::math::{Fix64, Mat22, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default friction coefficient for new bodies (0.2)
pub const DEFAULT_FRICTION: Fix64 = Fix64::from_raw(858_993_459);

// ============================================================================
// BodyHandle
// ============================================================================

/// Stable identity of a body registered with a [`World`](crate::world::World).
///
/// Handles are arena indices: they are assigned in registration order and
/// stay valid until the world is cleared. Their ordering is what makes an
/// [`ArbiterKey`](crate::arbiter::ArbiterKey) canonical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    /// Arena index of this handle
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Body
// ============================================================================

/// Oriented box rigid body
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// Center of mass (world space)
    pub position: Vec2,
    /// Orientation angle in radians
    pub rotation: Fix64,
    /// Linear velocity
    pub velocity: Vec2,
    /// Angular velocity (radians per second)
    pub angular_velocity: Fix64,
    /// Force accumulated since the last step
    pub force: Vec2,
    /// Torque accumulated since the last step
    pub torque: Fix64,
    /// Full box size (the collider uses `width / 2` as half extents)
    pub width: Vec2,
    /// Friction coefficient
    pub friction: Fix64,
    /// Mass (`Fix64::MAX` for static bodies)
    pub mass: Fix64,
    /// Inverse mass (0 = static/infinite mass)
    pub inv_mass: Fix64,
    /// Moment of inertia
    pub inertia: Fix64,
    /// Inverse moment of inertia
    pub inv_inertia: Fix64,
}

impl Default for Body {
    /// Static 1x1 box at the origin
    fn default() -> Self {
        Self::new_static(Vec2::from_int(1, 1))
    }
}

impl Body {
    /// Create a box of the given size and mass.
    ///
    /// Non-positive mass, or `Fix64::MAX`, produces a static body.
    pub fn new(width: Vec2, mass: Fix64) -> Self {
        let mut body = Self {
            position: Vec2::ZERO,
            rotation: Fix64::ZERO,
            velocity: Vec2::ZERO,
            angular_velocity: Fix64::ZERO,
            force: Vec2::ZERO,
            torque: Fix64::ZERO,
            width,
            friction: DEFAULT_FRICTION,
            mass: Fix64::MAX,
            inv_mass: Fix64::ZERO,
            inertia: Fix64::MAX,
            inv_inertia: Fix64::ZERO,
        };
        body.set(width, mass);
        body
    }

    /// Create an immovable box
    pub fn new_static(width: Vec2) -> Self {
        Self::new(width, Fix64::MAX)
    }

    /// Reset pose, velocities, and accumulators, then recompute mass
    /// properties for a box of `width` and `mass`.
    pub fn set(&mut self, width: Vec2, mass: Fix64) {
        self.position = Vec2::ZERO;
        self.rotation = Fix64::ZERO;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = Fix64::ZERO;
        self.force = Vec2::ZERO;
        self.torque = Fix64::ZERO;
        self.friction = DEFAULT_FRICTION;
        self.width = width;

        if mass.is_positive() && mass < Fix64::MAX {
            self.mass = mass;
            self.inv_mass = Fix64::ONE / mass;
            self.inertia = mass * (width.x * width.x + width.y * width.y) / Fix64::from_int(12);
            self.inv_inertia = if self.inertia.is_zero() {
                Fix64::ZERO
            } else {
                Fix64::ONE / self.inertia
            };
        } else {
            self.mass = Fix64::MAX;
            self.inv_mass = Fix64::ZERO;
            self.inertia = Fix64::MAX;
            self.inv_inertia = Fix64::ZERO;
        }
    }

    /// Builder: set position
    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder: set orientation angle (radians)
    #[must_use]
    pub fn with_rotation(mut self, rotation: Fix64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set linear velocity
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set angular velocity
    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: Fix64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Builder: set friction coefficient
    #[must_use]
    pub fn with_friction(mut self, friction: Fix64) -> Self {
        self.friction = friction;
        self
    }

    /// Accumulate a force through the center of mass
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Accumulate a torque
    #[inline]
    pub fn add_torque(&mut self, torque: Fix64) {
        self.torque += torque;
    }

    /// True when the body has infinite mass
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass.is_zero()
    }

    /// Half of `width`
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.width * Fix64::HALF
    }

    /// Rotation matrix for the current orientation
    #[inline]
    pub fn rotation_matrix(&self) -> Mat22 {
        Mat22::from_angle(self.rotation)
    }

    /// Check that the body describes a usable box.
    pub fn validate(&self) -> Result<()> {
        if !self.width.x.is_positive() || !self.width.y.is_positive() {
            return Err(PhysicsError::InvalidBody {
                reason: "width components must be positive",
            });
        }
        if self.friction.is_negative() {
            return Err(PhysicsError::InvalidBody {
                reason: "friction must not be negative",
            });
        }
        Ok(())
    }
}

/// Borrow two distinct bodies mutably, in index order.
///
/// # Panics
///
/// Panics if `a >= b` or `b` is out of range.
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    assert!(a < b, "pair_mut requires a < b");
    let (head, tail) = bodies.split_at_mut(b);
    (&mut head[a], &mut tail[0])
}

// ============================================================================
// Tests
// ============================================================================
