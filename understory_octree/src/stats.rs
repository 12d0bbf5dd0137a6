// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only introspection for tuning looseness and entry budgets.
//!
//! None of these affect correctness. They walk the whole tree (or one level of
//! it), so prefer calling them from tests, benchmarks, and debug tooling.

use core::fmt::{self, Display};

use crate::octree::Octree;

impl<D, T> Octree<D, T> {
    /// Number of levels below this node. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.children()
            .map(|c| 1 + c.iter().map(Self::depth).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// The largest number of entries held by any single node.
    ///
    /// This is the observed maximum, not the configured budget; a node may
    /// exceed its budget when entries fit none of its children.
    pub fn max_entries(&self) -> usize {
        let own = self.entries().len();
        self.children()
            .map(|c| c.iter().map(Self::max_entries).fold(own, usize::max))
            .unwrap_or(own)
    }

    /// Total entries held by the nodes `level` steps below this one.
    ///
    /// Level 0 is this node alone. Levels past the deepest leaf hold nothing.
    pub fn total_at(&self, level: usize) -> usize {
        if level == 0 {
            return self.entries().len();
        }
        self.children()
            .map(|c| c.iter().map(|child| child.total_at(level - 1)).sum())
            .unwrap_or(0)
    }

    /// Total number of entries stored in this node and all of its descendants.
    pub fn size(&self) -> usize {
        self.entries().len()
            + self
                .children()
                .map(|c| c.iter().map(Self::size).sum())
                .unwrap_or(0)
    }

    /// Total number of nodes, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(Self::node_count).sum())
            .unwrap_or(0)
    }
}

impl<D, T: Display + Copy> Display for Octree<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "LEAF box={} entries={}", self.bounds(), self.entries().len())
        } else {
            write!(
                f,
                "NODE box={} entries={} depth={}",
                self.bounds(),
                self.entries().len(),
                self.depth()
            )
        }
    }
}
