//! Physics World
//!
//! Owns the body arena and the arbiter map, and runs one fixed step at a time:
//!
//! 1. Broad phase: O(n²) pair scan creating, refreshing or dropping arbiters
//! 2. Force integration for dynamic bodies
//! 3. Arbiter pre-step (effective masses, bias, warm start)
//! 4. `iterations` sequential-impulse sweeps over every arbiter
//! 5. Position integration and force/torque reset
//!
//! Arbiters are kept in a `BTreeMap` keyed by handle pair, so iteration order
//! (and therefore the result of every step) is reproducible.

use std::collections::BTreeMap;

use crate::arbiter::{Arbiter, ArbiterKey};
use crate::body::{Body, BodyHandle};
use crate::collide::collide;
use crate::config::{SolverConfig, WorldConfig, MAX_ITERATIONS};
use crate::error::{PhysicsError, Result};
use crate::math::{Fix64, Vec2};

/// Box physics world
pub struct World {
    bodies: Vec<Body>,
    arbiters: BTreeMap<ArbiterKey, Arbiter>,
    /// Gravitational acceleration
    pub gravity: Vec2,
    /// Relaxation sweeps per step
    pub iterations: usize,
    /// Solver switches, read at the start of every step
    pub solver: SolverConfig,
}

impl Default for World {
    fn default() -> Self {
        let config = WorldConfig::default();
        Self::new(config.gravity, config.iterations)
    }
}

impl World {
    /// Create an empty world with default solver switches.
    ///
    /// `iterations` is clamped to `1..=MAX_ITERATIONS`; use
    /// [`World::with_config`] to reject out-of-range values instead.
    pub fn new(gravity: Vec2, iterations: usize) -> Self {
        let clamped = iterations.clamp(1, MAX_ITERATIONS);
        if clamped != iterations {
            log::warn!("Clamped iteration count {} to {}", iterations, clamped);
        }
        let iterations = clamped;
        log::debug!("Created world (gravity={:?}, iterations={})", gravity, iterations);
        Self {
            bodies: Vec::new(),
            arbiters: BTreeMap::new(),
            gravity,
            iterations,
            solver: SolverConfig::default(),
        }
    }

    /// Create an empty world from a validated configuration
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected world configuration: {}", e);
            return Err(e);
        }
        let mut world = Self::new(config.gravity, config.iterations);
        world.solver = config.solver;
        Ok(world)
    }

    /// Current configuration snapshot
    pub fn config(&self) -> WorldConfig {
        WorldConfig {
            gravity: self.gravity,
            iterations: self.iterations,
            solver: self.solver,
        }
    }

    /// Replace gravity, iteration count and solver switches at once
    pub fn set_config(&mut self, config: WorldConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected world configuration: {}", e);
            return Err(e);
        }
        log::debug!("World configuration changed: {:?}", config);
        self.gravity = config.gravity;
        self.iterations = config.iterations;
        self.solver = config.solver;
        Ok(())
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Register a body and return its handle
    pub fn add(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        log::trace!(
            "Added body {:?} (width={:?}, static={})",
            handle,
            body.width,
            body.is_static()
        );
        self.bodies.push(body);
        handle
    }

    /// Register a body after checking its shape and material
    pub fn try_add(&mut self, body: Body) -> Result<BodyHandle> {
        if let Err(e) = body.validate() {
            log::warn!("Rejected body: {}", e);
            return Err(e);
        }
        Ok(self.add(body))
    }

    /// Drop every body and arbiter. Previously issued handles become invalid.
    pub fn clear(&mut self) {
        log::debug!(
            "Clearing world ({} bodies, {} arbiters)",
            self.bodies.len(),
            self.arbiters.len()
        );
        self.bodies.clear();
        self.arbiters.clear();
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        let count = self.bodies.len();
        self.bodies
            .get(handle.index())
            .ok_or(PhysicsError::InvalidBodyHandle { handle, count })
    }

    /// Look up a body for mutation
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        let count = self.bodies.len();
        self.bodies
            .get_mut(handle.index())
            .ok_or(PhysicsError::InvalidBodyHandle { handle, count })
    }

    /// All bodies, indexed by handle
    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of registered bodies
    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Handles of all registered bodies, in registration order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> {
        (0..self.bodies.len() as u32).map(BodyHandle)
    }

    // ========================================================================
    // Arbiters
    // ========================================================================

    /// Active arbiters in key order
    pub fn arbiters(&self) -> impl Iterator<Item = (ArbiterKey, &Arbiter)> {
        self.arbiters.iter().map(|(key, arb)| (*key, arb))
    }

    /// Arbiter for an (unordered) body pair, if they are touching
    pub fn arbiter(&self, a: BodyHandle, b: BodyHandle) -> Option<&Arbiter> {
        self.arbiters.get(&ArbiterKey::new(a, b))
    }

    /// Number of active arbiters
    #[inline]
    pub fn arbiter_count(&self) -> usize {
        self.arbiters.len()
    }

    /// Total contact points across all arbiters
    pub fn contact_count(&self) -> usize {
        self.arbiters.values().map(Arbiter::num_contacts).sum()
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Refresh arbiters from the current body poses.
    ///
    /// Pairs where both bodies are static are never tested.
    pub fn broad_phase(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            let bi = &self.bodies[i];
            for j in (i + 1)..n {
                let bj = &self.bodies[j];
                let key = ArbiterKey::new(BodyHandle(i as u32), BodyHandle(j as u32));

                if bi.is_static() && bj.is_static() {
                    self.arbiters.remove(&key);
                    continue;
                }

                let manifold = collide(bi, bj);
                if manifold.is_empty() {
                    if self.arbiters.remove(&key).is_some() {
                        log::trace!("Removed arbiter {:?}", key);
                    }
                    continue;
                }

                match self.arbiters.get_mut(&key) {
                    Some(arb) => arb.update(&manifold, self.solver.warm_starting),
                    None => {
                        log::trace!("Created arbiter {:?} ({} contacts)", key, manifold.len());
                        self.arbiters
                            .insert(key, Arbiter::from_manifold(key, manifold, bi, bj));
                    }
                }
            }
        }
    }

    /// Advance the simulation by `dt`.
    ///
    /// A non-positive `dt` disables positional bias for this step; use
    /// [`World::try_step`] to reject it instead.
    pub fn step(&mut self, dt: Fix64) {
        let inv_dt = if dt.is_positive() {
            Fix64::ONE / dt
        } else {
            Fix64::ZERO
        };

        self.broad_phase();

        // Integrate forces
        let gravity = self.gravity;
        for b in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            b.velocity += dt * (gravity + b.inv_mass * b.force);
            b.angular_velocity += dt * b.inv_inertia * b.torque;
        }

        // Perform pre-steps
        for arb in self.arbiters.values_mut() {
            arb.pre_step(&mut self.bodies, inv_dt, &self.solver);
        }

        // Perform iterations
        let accumulate = self.solver.accumulate_impulses;
        for _ in 0..self.iterations {
            for arb in self.arbiters.values_mut() {
                arb.apply_impulse(&mut self.bodies, accumulate);
            }
        }

        // Integrate velocities
        for b in &mut self.bodies {
            b.position += dt * b.velocity;
            b.rotation += dt * b.angular_velocity;
            b.force = Vec2::ZERO;
            b.torque = Fix64::ZERO;
        }
    }

    /// Advance the simulation, rejecting a non-positive `dt`
    pub fn try_step(&mut self, dt: Fix64) -> Result<()> {
        if !dt.is_positive() {
            let e = PhysicsError::InvalidTimestep { dt };
            log::warn!("Rejected step: {}", e);
            return Err(e);
        }
        self.step(dt);
        Ok(())
    }
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("bodies", &self.bodies.len())
            .field("arbiters", &self.arbiters.len())
            .field("gravity", &self.gravity)
            .field("iterations", &self.iterations)
            .field("solver", &self.solver)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
