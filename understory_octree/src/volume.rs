// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability every octree payload must provide.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::types::{Aabb3D, Scalar};

/// Anything that occupies an axis-aligned region of space.
///
/// The octree never inspects a payload beyond its bounds (for placement and
/// queries) and its equality (for [`Octree::delete`](crate::Octree::delete)).
pub trait Volume<T: Scalar> {
    /// Bounding box of the payload.
    fn bounds(&self) -> Aabb3D<T>;
}

impl<T: Scalar> Volume<T> for Aabb3D<T> {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        *self
    }
}

/// A box paired with an arbitrary payload.
impl<T: Scalar, P> Volume<T> for (Aabb3D<T>, P) {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        self.0
    }
}

impl<T: Scalar, V: Volume<T> + ?Sized> Volume<T> for &V {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        (**self).bounds()
    }
}

impl<T: Scalar, V: Volume<T> + ?Sized> Volume<T> for Box<V> {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        (**self).bounds()
    }
}

impl<T: Scalar, V: Volume<T> + ?Sized> Volume<T> for Rc<V> {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        (**self).bounds()
    }
}

impl<T: Scalar, V: Volume<T> + ?Sized> Volume<T> for Arc<V> {
    #[inline]
    fn bounds(&self) -> Aabb3D<T> {
        (**self).bounds()
    }
}

/// Where an entry must be placed: the center of its bounds and its full extent.
///
/// A node accepts an entry only if the node's exact bounds contain the center
/// and the node's loose bounds contain the extent.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Placement<T> {
    pub(crate) center: [T; 3],
    pub(crate) extent: Aabb3D<T>,
}

impl<T: Scalar> Placement<T> {
    pub(crate) fn of<V: Volume<T> + ?Sized>(volume: &V) -> Self {
        let extent = volume.bounds();
        Self {
            center: extent.center(),
            extent,
        }
    }

    pub(crate) fn fits(&self, bounds: &Aabb3D<T>, loose_bounds: &Aabb3D<T>) -> bool {
        let [x, y, z] = self.center;
        bounds.contains_point(x, y, z) && loose_bounds.contains(&self.extent)
    }
}
