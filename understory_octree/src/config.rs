// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-wide tuning parameters and their validation.

use crate::types::{Aabb3D, Scalar};

/// Looseness used by [`OctreeConfig::default`].
pub const DEFAULT_LOOSENESS: f64 = 1.5;

/// Per-node entry budget used by [`OctreeConfig::default`].
pub const DEFAULT_MAX_ENTRIES: usize = 32;

/// Deepest level a node may be split to, used by [`OctreeConfig::new`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parameters fixed at root construction and shared by every node of a tree.
///
/// - `looseness` scales each node's bounds about its center to obtain the
///   loose bounds that entries must fit within. Values above `1.0` let entries
///   near a boundary settle in a child instead of staying at the parent.
///   Values at or below `1.0` produce a strict octree.
/// - `max_entries` is the number of entries a node holds on its own before a
///   leaf splits or an internal node routes new entries to its children.
/// - `max_depth` is the number of levels below the root at which nodes stop
///   splitting. A leaf at that level keeps every entry it accepts, past its
///   budget if need be. Entries that share a position can never be told apart
///   by splitting, so this bounds the tree no matter how many of them arrive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OctreeConfig<T> {
    /// Scale factor from exact bounds to loose bounds.
    pub looseness: T,
    /// Entries a node stores itself before pushing work to children.
    pub max_entries: usize,
    /// Levels below the root past which leaves no longer split.
    pub max_depth: usize,
}

impl<T: Scalar> OctreeConfig<T> {
    /// Create a config from explicit values, with [`DEFAULT_MAX_DEPTH`].
    pub const fn new(looseness: T, max_entries: usize) -> Self {
        Self {
            looseness,
            max_entries,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the depth limit. Zero keeps the root a leaf forever.
    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Check the parameters and the root bounds they will be used with.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroMaxEntries`] if `max_entries` is zero.
    /// - [`ConfigError::InvalidLooseness`] if `looseness` is not a finite, positive number.
    /// - [`ConfigError::InvertedBounds`] if `bounds` has `min > max` on some axis
    ///   or a non-finite coordinate.
    pub fn validate(&self, bounds: &Aabb3D<T>) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroMaxEntries);
        }
        if !T::is_finite(self.looseness) || self.looseness <= T::zero() {
            return Err(ConfigError::InvalidLooseness(T::to_f64(self.looseness)));
        }
        if bounds.is_empty() || !bounds.is_finite() {
            return Err(ConfigError::InvertedBounds);
        }
        Ok(())
    }

    /// Whether nodes built with this config have loose bounds strictly larger than their exact bounds.
    pub fn is_loose(&self) -> bool {
        self.looseness > T::one()
    }
}

impl<T: Scalar> Default for OctreeConfig<T> {
    fn default() -> Self {
        Self::new(T::from_f64(DEFAULT_LOOSENESS), DEFAULT_MAX_ENTRIES)
    }
}

/// Reasons [`Octree::try_with_config`](crate::Octree::try_with_config) rejects a configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A node must be allowed to hold at least one entry.
    #[error("max entries per node must be at least 1")]
    ZeroMaxEntries,

    /// The looseness factor must be finite and positive.
    #[error("looseness must be finite and positive, got {0}")]
    InvalidLooseness(f64),

    /// The root bounds are inverted or not finite.
    #[error("root bounds must be finite with min <= max on every axis")]
    InvertedBounds,
}
