// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display};
use core::ops::{Add, Mul, Sub};

/// Numeric scalar abstraction for 3D AABBs.
///
/// Only floating-point scalars are supported: loose bounds are derived by
/// scaling a box around its center, which has no sensible integer rendition.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type.
    fn one() -> Self;

    /// Half of the value.
    fn half(v: Self) -> Self;

    /// Midpoint between a and b, computed as `a / 2 + b / 2` so it cannot overflow.
    fn mid(a: Self, b: Self) -> Self {
        Self::half(a) + Self::half(b)
    }

    /// Whether the value is finite (not NaN or infinite).
    fn is_finite(v: Self) -> bool;

    /// Convert from `f64` (lossy for narrower types).
    fn from_f64(v: f64) -> Self;

    /// Widen to `f64` for reporting.
    fn to_f64(v: Self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Narrowing is the documented behavior of from_f64 for f32."
    )]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn half(v: Self) -> Self {
        0.5 * v
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        v
    }
}

/// Axis-aligned bounding box in 3D.
///
/// Boxes with `min == max` on some axis (zero volume) are legal. Boxes with
/// `min > max` are inverted; they are accepted without validation but the
/// results of queries against them are unspecified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Minimum z
    pub min_z: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
    /// Maximum z
    pub max_z: T,
}

impl<T> Aabb3D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, min_z: T, max_x: T, max_y: T, max_z: T) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }
}

impl<T: Scalar> Aabb3D<T> {
    /// Create an AABB from its minimum corner and its size along each axis.
    pub fn from_min_size(min: [T; 3], size: [T; 3]) -> Self {
        Self::new(
            min[0],
            min[1],
            min[2],
            min[0] + size[0],
            min[1] + size[1],
            min[2] + size[2],
        )
    }

    /// Create an AABB from its center and half extents.
    pub fn from_center_half_extents(center: [T; 3], half: [T; 3]) -> Self {
        Self::new(
            center[0] - half[0],
            center[1] - half[1],
            center[2] - half[2],
            center[0] + half[0],
            center[1] + half[1],
            center[2] + half[2],
        )
    }

    /// Create a cube around `center` reaching `half` along every axis.
    pub fn cube(center: [T; 3], half: T) -> Self {
        Self::from_center_half_extents(center, [half; 3])
    }

    /// Whether this AABB contains the point. Boundaries are inclusive.
    pub fn contains_point(&self, x: T, y: T, z: T) -> bool {
        le(self.min_x, x)
            && le(self.min_y, y)
            && le(self.min_z, z)
            && le(x, self.max_x)
            && le(y, self.max_y)
            && le(z, self.max_z)
    }

    /// Whether `other` lies entirely within this AABB. Boundaries are inclusive.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(self.min_z, other.min_z)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
            && le(other.max_z, self.max_z)
    }

    /// Whether the two AABBs overlap. Touching faces, edges, or corners count.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
            && le(self.min_z, other.max_z)
            && le(other.min_z, self.max_z)
    }

    /// Center point of the AABB.
    pub fn center(&self) -> [T; 3] {
        [
            T::mid(self.min_x, self.max_x),
            T::mid(self.min_y, self.max_y),
            T::mid(self.min_z, self.max_z),
        ]
    }

    /// Size of the AABB along each axis.
    ///
    /// Boxes wider than the scalar range report infinity; [`Aabb3D::half_extent`] does not.
    pub fn extent(&self) -> [T; 3] {
        [
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        ]
    }

    /// Half the size of the AABB along each axis.
    ///
    /// Computed as `max / 2 - min / 2`, so it stays finite for any finite box.
    pub fn half_extent(&self) -> [T; 3] {
        [
            T::half(self.max_x) - T::half(self.min_x),
            T::half(self.max_y) - T::half(self.min_y),
            T::half(self.max_z) - T::half(self.min_z),
        ]
    }

    /// Scale the AABB about its center by `factor` on every axis.
    ///
    /// A factor of `1.5` yields a box one and a half times as wide, tall, and deep.
    #[must_use]
    pub fn grow(&self, factor: T) -> Self {
        let [cx, cy, cz] = self.center();
        let [hx, hy, hz] = self.half_extent().map(|h| h * factor);
        Self::new(cx - hx, cy - hy, cz - hz, cx + hx, cy + hy, cz + hz)
    }

    /// Smallest AABB enclosing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            min_t(self.min_x, other.min_x),
            min_t(self.min_y, other.min_y),
            min_t(self.min_z, other.min_z),
            max_t(self.max_x, other.max_x),
            max_t(self.max_y, other.max_y),
            max_t(self.max_z, other.max_z),
        )
    }

    /// Return true if the AABB is inverted on some axis. Zero-volume boxes are not empty.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y) || lt(self.max_z, self.min_z)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
        .into_iter()
        .all(T::is_finite)
    }

    /// The eighth of this AABB selected by `octant`, split at the midpoint of each axis.
    pub fn octant(&self, octant: Octant) -> Self {
        let [mx, my, mz] = self.center();
        let (min_x, max_x) = if octant.contains(Octant::X_HIGH) {
            (mx, self.max_x)
        } else {
            (self.min_x, mx)
        };
        let (min_y, max_y) = if octant.contains(Octant::Y_HIGH) {
            (my, self.max_y)
        } else {
            (self.min_y, my)
        };
        let (min_z, max_z) = if octant.contains(Octant::Z_HIGH) {
            (mz, self.max_z)
        } else {
            (self.min_z, mz)
        };
        Self::new(min_x, min_y, min_z, max_x, max_y, max_z)
    }
}

impl<T: Display> Display for Aabb3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}] x [{}, {}]",
            self.min_x, self.max_x, self.min_y, self.max_y, self.min_z, self.max_z
        )
    }
}

bitflags::bitflags! {
    /// One of the eight children of an octree node.
    ///
    /// Each flag selects the upper half of the parent along one axis; an absent
    /// flag selects the lower half. The numeric value of an octant is also its
    /// child index, so iterating `0..8` visits X-low before X-high, then Y, then
    /// Z, with Z varying fastest.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Octant: u8 {
        /// Upper half along x.
        const X_HIGH = 0b100;
        /// Upper half along y.
        const Y_HIGH = 0b010;
        /// Upper half along z.
        const Z_HIGH = 0b001;
    }
}

impl Octant {
    /// Number of octants per node.
    pub const COUNT: usize = 8;

    /// All octants in child-index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::from_bits_retain(0b000),
        Self::from_bits_retain(0b001),
        Self::from_bits_retain(0b010),
        Self::from_bits_retain(0b011),
        Self::from_bits_retain(0b100),
        Self::from_bits_retain(0b101),
        Self::from_bits_retain(0b110),
        Self::from_bits_retain(0b111),
    ];

    /// Child index of this octant.
    pub const fn index(self) -> usize {
        self.bits() as usize
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
