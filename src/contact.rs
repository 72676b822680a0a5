//! Contact Points and Feature Identifiers
//!
//! A [`Contact`] carries both the geometry produced by the narrow phase and
//! the accumulated impulses the solver carries across frames. Contacts are
//! matched from one step to the next purely by their [`FeaturePair`].

use crate::math::{Fix64, Vec2};

/// Maximum contact points between one pair of boxes
pub const MAX_POINTS: usize = 2;

// ============================================================================
// Edge labels
// ============================================================================

/// Box edge label.
///
/// ```text
///        ^ y
///        |
///        e1
///   v2 ------ v1
///    |        |
/// e2 |        | e4  --> x
///    |        |
///   v3 ------ v4
///        e3
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Edge {
    /// No edge (clip-generated vertex on the other box)
    #[default]
    None = 0,
    /// Top edge (+y)
    E1 = 1,
    /// Left edge (-x)
    E2 = 2,
    /// Bottom edge (-y)
    E3 = 3,
    /// Right edge (+x)
    E4 = 4,
}

// ============================================================================
// FeaturePair
// ============================================================================

/// Which edges of box 1 and box 2 produced a contact point.
///
/// Always expressed from the first body's perspective, so the same physical
/// corner keeps the same identifier regardless of which face the collider
/// picked as reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeaturePair {
    /// Edge of box 1 entering the contact
    pub in_edge1: Edge,
    /// Edge of box 1 leaving the contact
    pub out_edge1: Edge,
    /// Edge of box 2 entering the contact
    pub in_edge2: Edge,
    /// Edge of box 2 leaving the contact
    pub out_edge2: Edge,
}

impl FeaturePair {
    /// Packed little-endian form: `in1 | out1 << 8 | in2 << 16 | out2 << 24`
    #[inline]
    pub const fn value(self) -> u32 {
        (self.in_edge1 as u32)
            | (self.out_edge1 as u32) << 8
            | (self.in_edge2 as u32) << 16
            | (self.out_edge2 as u32) << 24
    }

    /// Swap the roles of box 1 and box 2
    #[inline]
    pub fn flip(&mut self) {
        core::mem::swap(&mut self.in_edge1, &mut self.in_edge2);
        core::mem::swap(&mut self.out_edge1, &mut self.out_edge2);
    }
}

// ============================================================================
// Contact
// ============================================================================

/// A contact point between two boxes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact {
    /// World-space contact position (on the reference face)
    pub position: Vec2,
    /// Contact normal, pointing from body 1 to body 2
    pub normal: Vec2,
    /// Offset from body 1's center (set by pre-step)
    pub r1: Vec2,
    /// Offset from body 2's center (set by pre-step)
    pub r2: Vec2,
    /// Signed separation (negative = penetrating)
    pub separation: Fix64,
    /// Accumulated normal impulse
    pub pn: Fix64,
    /// Accumulated tangent impulse
    pub pt: Fix64,
    /// Accumulated normal impulse for position bias
    pub pnb: Fix64,
    /// Effective mass along the normal
    pub mass_normal: Fix64,
    /// Effective mass along the tangent
    pub mass_tangent: Fix64,
    /// Velocity bias for penetration recovery
    pub bias: Fix64,
    /// Feature identifier used to match this contact across frames
    pub feature: FeaturePair,
}

impl Contact {
    /// Drop all accumulated impulses
    #[inline]
    pub fn reset_impulses(&mut self) {
        self.pn = Fix64::ZERO;
        self.pt = Fix64::ZERO;
        self.pnb = Fix64::ZERO;
    }
}

// ============================================================================
// Manifold
// ============================================================================

/// Up to [`MAX_POINTS`] contacts, stored inline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Manifold {
    points: [Contact; MAX_POINTS],
    len: usize,
}

impl Manifold {
    /// Empty manifold
    pub const fn new() -> Self {
        Self {
            points: [Contact {
                position: Vec2::ZERO,
                normal: Vec2::ZERO,
                r1: Vec2::ZERO,
                r2: Vec2::ZERO,
                separation: Fix64::ZERO,
                pn: Fix64::ZERO,
                pt: Fix64::ZERO,
                pnb: Fix64::ZERO,
                mass_normal: Fix64::ZERO,
                mass_tangent: Fix64::ZERO,
                bias: Fix64::ZERO,
                feature: FeaturePair {
                    in_edge1: Edge::None,
                    out_edge1: Edge::None,
                    in_edge2: Edge::None,
                    out_edge2: Edge::None,
                },
            }; MAX_POINTS],
            len: 0,
        }
    }

    /// Append a contact. Contacts beyond [`MAX_POINTS`] are ignored.
    pub fn push(&mut self, contact: Contact) {
        if self.len < MAX_POINTS {
            self.points[self.len] = contact;
            self.len += 1;
        }
    }

    /// Number of contacts
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no contacts are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored contacts
    #[inline]
    pub fn as_slice(&self) -> &[Contact] {
        &self.points[..self.len]
    }

    /// Stored contacts, mutably
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Contact] {
        &mut self.points[..self.len]
    }

    /// Iterate over stored contacts
    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.as_slice().iter()
    }
}
