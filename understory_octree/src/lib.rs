// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_octree --heading-base-level=0

//! Understory Octree: a persistent loose octree over 3D AABBs.
//!
//! Understory Octree is a spatial index for anything with a 3D bounding box.
//!
//! - Insert and delete entries; every update returns a new tree and leaves the old one intact.
//! - Query by intersecting box or by point.
//! - Share unchanged subtrees between versions, so old snapshots stay cheap and readable from any thread.
//!
//! Payloads implement [`Volume`] (one method: [`Volume::bounds`]). Boxes themselves and
//! `(Aabb3D, payload)` tuples already do.
//!
//! # Example
//!
//! ```rust
//! use understory_octree::{Aabb3D, Octree};
//!
//! let empty: Octree<(Aabb3D<f64>, &str)> =
//!     Octree::new(Aabb3D::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0));
//!
//! let tree = empty
//!     .insert((Aabb3D::cube([10.0, 10.0, 10.0], 1.0), "near"))
//!     .insert((Aabb3D::cube([90.0, 90.0, 90.0], 1.0), "far"));
//!
//! // Query a box around the first entry.
//! let hits = tree.select(&Aabb3D::new(0.0, 0.0, 0.0, 20.0, 20.0, 20.0));
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, "near");
//!
//! // The original handle is unchanged.
//! assert_eq!(empty.size(), 0);
//! assert_eq!(tree.size(), 2);
//! ```
//!
//! Updates that change nothing hand back the same tree, so callers can detect
//! them without comparing contents:
//!
//! ```rust
//! use understory_octree::{Aabb3D, Octree};
//!
//! let tree: Octree<Aabb3D<f64>> = Octree::new(Aabb3D::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));
//! let outside = Aabb3D::cube([50.0, 5.0, 5.0], 1.0);
//! assert!(Octree::ptr_eq(&tree, &tree.insert(outside)));
//! assert!(Octree::ptr_eq(&tree, &tree.delete(&outside)));
//! ```
//!
//! ## Loose bounds
//!
//! Each node covers an exact region (one eighth of its parent) and a loose
//! region: the exact one scaled about its center by the tree's looseness
//! (1.5 by default). An entry descends into a child when the child's exact
//! region contains the entry's center and its loose region contains the whole
//! entry. Entries near a boundary therefore still reach small nodes, and
//! small moves rarely change which node an entry belongs to. Queries visit a
//! child whenever its loose region intersects the query.
//!
//! ## Entry budget and splitting
//!
//! Every node stores up to [`OctreeConfig::max_entries`] entries (32 by
//! default) itself. A full leaf splits into eight children and pushes down
//! whatever fits them; a full internal node routes new entries to its first
//! accepting child. Entries that fit no child stay where they are, which may
//! take a node past its budget. Leaves at [`OctreeConfig::max_depth`] never
//! split, so piles of entries at one position cannot deepen the tree without
//! bound.
//!
//! [`Octree::insert_all`] is the preferred way to load many entries: it fills a
//! node's own spare capacity first and hands the remainder to its children in
//! one pass.
//!
//! Deletion never merges children back into a leaf; a tree's depth only grows.
//!
//! ## Concurrency
//!
//! An [`Octree`] is an immutable value behind reference counting. Any number of
//! threads may read the same handle. Writers each derive their own new root;
//! serialize them (for example with a lock or compare-and-swap around the
//! current root) if every update must be kept.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs. Boxes with `min > max` are accepted but query
//! results against them are unspecified.

#![no_std]

extern crate alloc;

pub mod config;
pub mod octree;
pub mod stats;
pub mod types;
pub mod volume;

pub use config::{
    ConfigError, DEFAULT_LOOSENESS, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENTRIES, OctreeConfig,
};
pub use octree::{Iter, Octree};
pub use types::{Aabb3D, Octant, Scalar};
pub use volume::Volume;
