//! Contact Arbiters with Warm Starting
//!
//! An [`Arbiter`] owns the persistent contact set of one body pair. Each step
//! it merges freshly collided geometry with the impulses accumulated in the
//! previous step, precomputes effective masses and bias, and then runs
//! Gauss-Seidel relaxation sweeps over its contacts.

use crate::body::{pair_mut, Body, BodyHandle};
use crate::collide::collide;
use crate::config::SolverConfig;
use crate::contact::{Contact, Manifold};
use crate::math::{cross_sv, cross_vs, Fix64, Vec2};

/// Penetration tolerated without bias (0.01)
pub const ALLOWED_PENETRATION: Fix64 = Fix64::from_raw(42_949_673);

/// Fraction of the penetration fed back per step when position correction is on (0.2)
pub const BIAS_FACTOR: Fix64 = Fix64::from_raw(858_993_459);

// ============================================================================
// ArbiterKey
// ============================================================================

/// Canonical (unordered) body pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArbiterKey {
    /// The smaller handle
    pub body1: BodyHandle,
    /// The larger handle
    pub body2: BodyHandle,
}

impl ArbiterKey {
    /// Create a canonical key (ensures `body1 <= body2`)
    #[inline]
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a < b {
            Self { body1: a, body2: b }
        } else {
            Self { body1: b, body2: a }
        }
    }
}

// ============================================================================
// Arbiter
// ============================================================================

/// Persistent contact state for one body pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arbiter {
    key: ArbiterKey,
    contacts: Manifold,
    friction: Fix64,
}

impl Arbiter {
    /// Collide `b1` against `b2` and set up the arbiter.
    ///
    /// The pair is reordered so that `body1` is the smaller handle; the
    /// contact normal then points from `body1` to `body2`.
    pub fn new(h1: BodyHandle, b1: &Body, h2: BodyHandle, b2: &Body) -> Self {
        let key = ArbiterKey::new(h1, h2);
        let (first, second) = if key.body1 == h1 { (b1, b2) } else { (b2, b1) };
        Self::from_manifold(key, collide(first, second), first, second)
    }

    /// Build an arbiter around contacts that were already collided in `key` order.
    pub(crate) fn from_manifold(key: ArbiterKey, contacts: Manifold, b1: &Body, b2: &Body) -> Self {
        Self {
            key,
            contacts,
            friction: (b1.friction * b2.friction).sqrt(),
        }
    }

    /// Canonical pair key
    #[inline]
    pub fn key(&self) -> ArbiterKey {
        self.key
    }

    /// Handle of the first body
    #[inline]
    pub fn body1(&self) -> BodyHandle {
        self.key.body1
    }

    /// Handle of the second body
    #[inline]
    pub fn body2(&self) -> BodyHandle {
        self.key.body2
    }

    /// Current contacts
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        self.contacts.as_slice()
    }

    /// Number of current contacts
    #[inline]
    pub fn num_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// Combined friction `sqrt(friction1 * friction2)`
    #[inline]
    pub fn friction(&self) -> Fix64 {
        self.friction
    }

    /// Replace the contact set with `new_contacts`, carrying impulses over
    /// from old contacts with an identical feature identifier.
    pub fn update(&mut self, new_contacts: &Manifold, warm_starting: bool) {
        let mut merged = Manifold::new();

        for c_new in new_contacts.iter() {
            let mut c = *c_new;
            match self.contacts.iter().find(|old| old.feature == c_new.feature) {
                Some(old) if warm_starting => {
                    c.pn = old.pn;
                    c.pt = old.pt;
                    c.pnb = old.pnb;
                }
                _ => c.reset_impulses(),
            }
            merged.push(c);
        }

        self.contacts = merged;
    }

    /// Precompute effective masses and bias, and apply the warm-start impulse.
    pub fn pre_step(&mut self, bodies: &mut [Body], inv_dt: Fix64, solver: &SolverConfig) {
        let bias_factor = if solver.position_correction {
            BIAS_FACTOR
        } else {
            Fix64::ZERO
        };
        let (b1, b2) = pair_mut(bodies, self.key.body1.index(), self.key.body2.index());

        for c in self.contacts.as_mut_slice() {
            let r1 = c.position - b1.position;
            let r2 = c.position - b2.position;
            c.r1 = r1;
            c.r2 = r2;

            // Precompute normal mass, tangent mass, and bias
            let rn1 = r1.dot(c.normal);
            let rn2 = r2.dot(c.normal);
            let k_normal = b1.inv_mass
                + b2.inv_mass
                + b1.inv_inertia * (r1.dot(r1) - rn1 * rn1)
                + b2.inv_inertia * (r2.dot(r2) - rn2 * rn2);
            c.mass_normal = Fix64::ONE / k_normal;

            let tangent = cross_vs(c.normal, Fix64::ONE);
            let rt1 = r1.dot(tangent);
            let rt2 = r2.dot(tangent);
            let k_tangent = b1.inv_mass
                + b2.inv_mass
                + b1.inv_inertia * (r1.dot(r1) - rt1 * rt1)
                + b2.inv_inertia * (r2.dot(r2) - rt2 * rt2);
            c.mass_tangent = Fix64::ONE / k_tangent;

            c.bias = -bias_factor * inv_dt * Fix64::ZERO.min(c.separation + ALLOWED_PENETRATION);

            if solver.accumulate_impulses {
                // Apply normal + friction impulse
                let p = c.pn * c.normal + c.pt * tangent;
                apply_pair_impulse(b1, b2, r1, r2, p);
            }
        }
    }

    /// One relaxation sweep over this arbiter's contacts.
    pub fn apply_impulse(&mut self, bodies: &mut [Body], accumulate_impulses: bool) {
        let friction = self.friction;
        let (b1, b2) = pair_mut(bodies, self.key.body1.index(), self.key.body2.index());

        for c in self.contacts.as_mut_slice() {
            // Relative velocity at contact
            let dv = relative_velocity(b1, b2, c.r1, c.r2);

            // Normal impulse
            let vn = dv.dot(c.normal);
            let mut dpn = c.mass_normal * (-vn + c.bias);

            if accumulate_impulses {
                // Clamp the accumulated impulse
                let pn0 = c.pn;
                c.pn = (pn0 + dpn).max(Fix64::ZERO);
                dpn = c.pn - pn0;
            } else {
                dpn = dpn.max(Fix64::ZERO);
            }

            apply_pair_impulse(b1, b2, c.r1, c.r2, dpn * c.normal);

            // Friction reacts to the post-normal-impulse velocity
            let dv = relative_velocity(b1, b2, c.r1, c.r2);
            let tangent = cross_vs(c.normal, Fix64::ONE);
            let vt = dv.dot(tangent);
            let mut dpt = c.mass_tangent * (-vt);

            if accumulate_impulses {
                let max_pt = friction * c.pn;
                let old_tangent_impulse = c.pt;
                c.pt = (old_tangent_impulse + dpt).max(-max_pt).min(max_pt);
                dpt = c.pt - old_tangent_impulse;
            } else {
                let max_pt = friction * dpn;
                dpt = dpt.max(-max_pt).min(max_pt);
            }

            apply_pair_impulse(b1, b2, c.r1, c.r2, dpt * tangent);
        }
    }
}

/// `(v2 + ω2 × r2) − (v1 + ω1 × r1)`
#[inline]
fn relative_velocity(b1: &Body, b2: &Body, r1: Vec2, r2: Vec2) -> Vec2 {
    b2.velocity + cross_sv(b2.angular_velocity, r2)
        - b1.velocity
        - cross_sv(b1.angular_velocity, r1)
}

/// Apply `p` to body 2 and `-p` to body 1 at the given contact offsets
#[inline]
fn apply_pair_impulse(b1: &mut Body, b2: &mut Body, r1: Vec2, r2: Vec2, p: Vec2) {
    b1.velocity -= b1.inv_mass * p;
    b1.angular_velocity -= b1.inv_inertia * r1.cross(p);

    b2.velocity += b2.inv_mass * p;
    b2.angular_velocity += b2.inv_inertia * r2.cross(p);
}

// ============================================================================
// Tests
// ============================================================================
