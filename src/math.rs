//! Deterministic Fixed-Point Mathematics
//!
//! Bit-exact scalar, vector, and matrix arithmetic for the box solver. The
//! same inputs produce the same bits on x86, ARM, WASM, or a microcontroller.
//!
//! # Types
//!
//! - [`Fix64`] (I32F32): 64-bit fixed-point with 32 integer bits, 32 fractional bits
//! - [`Vec2`]: 2D vector using Fix64 components
//! - [`Mat22`]: 2x2 rotation matrix stored as two columns
//!
//! # Precision
//!
//! - Range: ±2.1 × 10^9
//! - Precision: ~2.3 × 10^-10
//!
//! Multiplication rounds toward negative infinity through a 128-bit
//! intermediate. Square root and sine/cosine are computed in integer
//! arithmetic only, so no IEEE 754 rounding mode ever leaks into a step.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const FRAC_BITS: u32 = 32;

// ============================================================================
// Fix64 (I32F32) - 64-bit Fixed-Point Number
// ============================================================================

/// 64-bit fixed-point number (32 integer bits, 32 fractional bits)
///
/// Internal representation: `value = raw / 2^32`
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct Fix64(i64);

impl Fix64 {
    /// Zero constant
    pub const ZERO: Self = Self(0);

    /// One constant (1.0)
    pub const ONE: Self = Self(1 << FRAC_BITS);

    /// Negative one (-1.0)
    pub const NEG_ONE: Self = Self(-(1 << FRAC_BITS));

    /// One half (0.5)
    pub const HALF: Self = Self(1 << (FRAC_BITS - 1));

    /// Pi (π)
    pub const PI: Self = Self(13_493_037_705);

    /// Half Pi (π/2)
    pub const HALF_PI: Self = Self(6_746_518_852);

    /// Two Pi (2π)
    pub const TWO_PI: Self = Self(26_986_075_409);

    /// Largest representable value. Stands in for "infinite" mass.
    pub const MAX: Self = Self(i64::MAX);

    /// Smallest representable value
    pub const MIN: Self = Self(i64::MIN);

    /// Smallest positive value (2^-32)
    pub const EPSILON: Self = Self(1);

    /// Create from integer
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self((n as i64) << FRAC_BITS)
    }

    /// Create from the raw I32F32 bit pattern
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw I32F32 bit pattern
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Create from fraction (numerator / denominator), truncating toward zero.
    ///
    /// A zero denominator yields `ZERO`.
    pub fn from_ratio(num: i64, denom: i64) -> Self {
        if denom == 0 {
            return Self::ZERO;
        }
        Self((((num as i128) << FRAC_BITS) / denom as i128) as i64)
    }

    /// Create from f64 (for initialization only, not deterministic!)
    pub fn from_f64(f: f64) -> Self {
        Self((f * (1u64 << FRAC_BITS) as f64).round() as i64)
    }

    /// Convert to f64 (for debugging only, not deterministic!)
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC_BITS) as f64
    }

    /// Absolute value (saturates at `MAX` for `MIN`)
    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Check if negative
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Check if strictly positive
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if zero
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `-1` for negative values, `+1` otherwise (zero counts as positive)
    #[inline]
    pub fn sign(self) -> Self {
        if self.is_negative() {
            Self::NEG_ONE
        } else {
            Self::ONE
        }
    }

    /// Divide by 2 (arithmetic shift, exact up to the last bit)
    #[inline]
    pub const fn half(self) -> Self {
        Self(self.0 >> 1)
    }

    /// Square root on the raw representation.
    ///
    /// `sqrt(raw / 2^32) * 2^32 == isqrt(raw << 32)`, so the result is the
    /// exact floor of the true root. Negative input yields `ZERO`.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        Self(isqrt_u128((self.0 as u128) << FRAC_BITS) as i64)
    }

    /// Sine using CORDIC (deterministic)
    pub fn sin(self) -> Self {
        cordic_sin_cos(self).0
    }

    /// Cosine using CORDIC (deterministic)
    pub fn cos(self) -> Self {
        cordic_sin_cos(self).1
    }

    /// Simultaneous sin and cos
    pub fn sin_cos(self) -> (Self, Self) {
        cordic_sin_cos(self)
    }
}

impl fmt::Debug for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fix64({})", self.to_f64())
    }
}

impl fmt::Display for Fix64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl Add for Fix64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fix64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fix64 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        // 64x64 -> 128 bit product, keep the middle 64 bits
        Self(((self.0 as i128 * rhs.0 as i128) >> FRAC_BITS) as i64)
    }
}

impl Div for Fix64 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return Self::ZERO;
        }
        Self((((self.0 as i128) << FRAC_BITS) / rhs.0 as i128) as i64)
    }
}

impl Neg for Fix64 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl AddAssign for Fix64 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fix64 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fix64 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl PartialOrd for Fix64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fix64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Integer square root (floor), bit-by-bit so the cost is fixed.
fn isqrt_u128(n: u128) -> u128 {
    let mut rem = n;
    let mut root: u128 = 0;
    let mut bit: u128 = 1 << 126;

    while bit > rem {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

// ============================================================================
// CORDIC Algorithm (Coordinate Rotation Digital Computer)
// ============================================================================

const CORDIC_ITERATIONS: usize = 32;

/// arctan(2^-i) in I32F32
const CORDIC_ANGLES: [i64; CORDIC_ITERATIONS] = [
    3_373_259_426,
    1_991_351_318,
    1_052_175_346,
    534_100_635,
    268_086_748,
    134_174_063,
    67_103_403,
    33_553_749,
    16_777_131,
    8_388_597,
    4_194_303,
    2_097_152,
    1_048_576,
    524_288,
    262_144,
    131_072,
    65_536,
    32_768,
    16_384,
    8_192,
    4_096,
    2_048,
    1_024,
    512,
    256,
    128,
    64,
    32,
    16,
    8,
    4,
    2,
];

/// CORDIC gain K = prod(cos(arctan(2^-i))) ≈ 0.6072529350088814
const CORDIC_K: i64 = 2_608_131_496;

/// CORDIC sine and cosine (deterministic, 32 iterations)
fn cordic_sin_cos(angle: Fix64) -> (Fix64, Fix64) {
    if angle.is_zero() {
        return (Fix64::ZERO, Fix64::ONE);
    }

    // Reduce to [-π, π]
    let two_pi = Fix64::TWO_PI.raw() as i128;
    let mut theta = (angle.raw() as i128) % two_pi;
    if theta > Fix64::PI.raw() as i128 {
        theta -= two_pi;
    } else if theta < -(Fix64::PI.raw() as i128) {
        theta += two_pi;
    }
    let mut theta = theta as i64;

    // CORDIC only converges for |θ| < ~1.74, fold the outer half-planes
    let mut flip = false;
    if theta > Fix64::HALF_PI.raw() {
        theta -= Fix64::PI.raw();
        flip = true;
    } else if theta < -Fix64::HALF_PI.raw() {
        theta += Fix64::PI.raw();
        flip = true;
    }

    let mut x = CORDIC_K;
    let mut y = 0i64;
    let mut z = theta;

    for (i, &step) in CORDIC_ANGLES.iter().enumerate() {
        let x_shift = x >> i;
        let y_shift = y >> i;
        if z >= 0 {
            x -= y_shift;
            y += x_shift;
            z -= step;
        } else {
            x += y_shift;
            y -= x_shift;
            z += step;
        }
    }

    if flip {
        (Fix64(-y), Fix64(-x))
    } else {
        (Fix64(y), Fix64(x))
    }
}

// ============================================================================
// Vec2 - 2D Vector with Fixed-Point Components
// ============================================================================

/// 2D vector using [`Fix64`] components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    /// X component
    pub x: Fix64,
    /// Y component
    pub y: Fix64,
}

impl Vec2 {
    /// Zero vector (0, 0)
    pub const ZERO: Self = Self {
        x: Fix64::ZERO,
        y: Fix64::ZERO,
    };

    /// Unit X vector (1, 0)
    pub const UNIT_X: Self = Self {
        x: Fix64::ONE,
        y: Fix64::ZERO,
    };

    /// Unit Y vector (0, 1)
    pub const UNIT_Y: Self = Self {
        x: Fix64::ZERO,
        y: Fix64::ONE,
    };

    /// Create a new 2D vector.
    #[inline]
    #[must_use]
    pub const fn new(x: Fix64, y: Fix64) -> Self {
        Self { x, y }
    }

    /// Create from integer components.
    #[inline]
    #[must_use]
    pub const fn from_int(x: i32, y: i32) -> Self {
        Self {
            x: Fix64::from_int(x),
            y: Fix64::from_int(y),
        }
    }

    /// Create from f64 components (initialization only).
    #[must_use]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: Fix64::from_f64(x),
            y: Fix64::from_f64(y),
        }
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> Fix64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product (z-component of the embedded 3D cross product).
    #[inline]
    #[must_use]
    pub fn cross(self, rhs: Self) -> Fix64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Squared length (avoids sqrt).
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> Fix64 {
        self.dot(self)
    }

    /// Length (magnitude).
    #[inline]
    #[must_use]
    pub fn length(self) -> Fix64 {
        self.length_squared().sqrt()
    }

    /// Component-wise absolute value.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }
}

/// `v × s`: the vector `(s·v.y, −s·v.x)`.
#[inline]
#[must_use]
pub fn cross_vs(v: Vec2, s: Fix64) -> Vec2 {
    Vec2::new(s * v.y, -s * v.x)
}

/// `s × v`: the vector `(−s·v.y, s·v.x)`.
#[inline]
#[must_use]
pub fn cross_sv(s: Fix64, v: Vec2) -> Vec2 {
    Vec2::new(-s * v.y, s * v.x)
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<Fix64> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, s: Fix64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl Mul<Vec2> for Fix64 {
    type Output = Vec2;

    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<Fix64> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, s: Fix64) {
        *self = *self * s;
    }
}

// ============================================================================
// Mat22 - 2x2 Matrix
// ============================================================================

/// 2x2 matrix stored as two columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mat22 {
    /// First column
    pub col1: Vec2,
    /// Second column
    pub col2: Vec2,
}

impl Mat22 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        col1: Vec2::UNIT_X,
        col2: Vec2::UNIT_Y,
    };

    /// Create from columns
    #[inline]
    pub const fn new(col1: Vec2, col2: Vec2) -> Self {
        Self { col1, col2 }
    }

    /// Counter-clockwise rotation by `angle` radians
    pub fn from_angle(angle: Fix64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            col1: Vec2::new(c, s),
            col2: Vec2::new(-s, c),
        }
    }

    /// Transpose
    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            col1: Vec2::new(self.col1.x, self.col2.x),
            col2: Vec2::new(self.col1.y, self.col2.y),
        }
    }

    /// Inverse.
    ///
    /// # Panics
    ///
    /// Panics if the determinant is zero.
    pub fn invert(self) -> Self {
        let (a, b, c, d) = (self.col1.x, self.col2.x, self.col1.y, self.col2.y);
        let det = a * d - b * c;
        assert!(!det.is_zero(), "Mat22::invert: singular matrix");
        let det = Fix64::ONE / det;
        Self {
            col1: Vec2::new(det * d, -det * c),
            col2: Vec2::new(-det * b, det * a),
        }
    }

    /// Element-wise absolute value
    #[inline]
    pub fn abs(self) -> Self {
        Self {
            col1: self.col1.abs(),
            col2: self.col2.abs(),
        }
    }
}

impl Mul<Vec2> for Mat22 {
    type Output = Vec2;

    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.col1.x * v.x + self.col2.x * v.y,
            self.col1.y * v.x + self.col2.y * v.y,
        )
    }
}

impl Mul for Mat22 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            col1: self * rhs.col1,
            col2: self * rhs.col2,
        }
    }
}

impl Add for Mat22 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            col1: self.col1 + rhs.col1,
            col2: self.col2 + rhs.col2,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
