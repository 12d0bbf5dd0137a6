// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent loose octree: construction, queries, and copy-on-write updates.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::config::{ConfigError, OctreeConfig};
use crate::types::{Aabb3D, Octant, Scalar};
use crate::volume::{Placement, Volume};

/// The eight children of an internal node, shared between tree versions.
type Children<D, T> = Arc<[Octree<D, T>; Octant::COUNT]>;

/// A node of a persistent loose octree, and a handle to the tree rooted there.
///
/// Every update (`insert`, `insert_all`, `delete`) leaves `self` untouched and
/// returns a new handle. Only the nodes on the path from the root to the
/// change are rebuilt; every other node and every untouched entry list is
/// shared between the old and the new version. Cloning a handle is a
/// reference-count bump.
///
/// When an update changes nothing (the entry does not fit the root, or the
/// entry to delete is absent) the returned handle is identical to `self`, as
/// reported by [`Octree::ptr_eq`].
///
/// Entries are placed at the deepest node whose exact bounds contain the
/// entry's center and whose loose bounds contain its full extent, subject to
/// each node's entry budget ([`OctreeConfig::max_entries`]).
pub struct Octree<D, T = f64> {
    node: Arc<Node<D, T>>,
}

struct Node<D, T> {
    bounds: Aabb3D<T>,
    loose_bounds: Aabb3D<T>,
    config: OctreeConfig<T>,
    /// Distance from the root; the root is level 0.
    level: usize,
    children: Option<Children<D, T>>,
    entries: Arc<[D]>,
}

impl<D, T> Clone for Octree<D, T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<D, T: Debug> Debug for Octree<D, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Octree")
            .field("bounds", &self.node.bounds)
            .field("entries", &self.node.entries.len())
            .field("leaf", &self.node.children.is_none())
            .finish_non_exhaustive()
    }
}

impl<D, T> Octree<D, T> {
    /// Whether two handles refer to the same node.
    ///
    /// An update that changed nothing returns a handle for which this is true.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.node, &b.node)
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node.children.is_none()
    }

    /// Entries stored at this node itself (not in its children).
    pub fn entries(&self) -> &[D] {
        &self.node.entries
    }

    /// The eight children in octant order, or `None` for a leaf.
    pub fn children(&self) -> Option<&[Self; Octant::COUNT]> {
        self.node.children.as_deref()
    }

    /// The child covering `octant`, or `None` for a leaf.
    pub fn child(&self, octant: Octant) -> Option<&Self> {
        self.children().map(|c| &c[octant.index()])
    }

    /// Depth-first iterator over every stored entry.
    ///
    /// A node's own entries come before those of its children, and children
    /// are visited in octant order.
    pub fn iter(&self) -> Iter<'_, D, T> {
        Iter {
            stack: alloc::vec![self],
            current: Default::default(),
        }
    }
}

impl<D, T: Copy> Octree<D, T> {
    /// Exact bounds of this node.
    pub fn bounds(&self) -> Aabb3D<T> {
        self.node.bounds
    }

    /// Loose bounds of this node: the exact bounds grown by the looseness factor.
    pub fn loose_bounds(&self) -> Aabb3D<T> {
        self.node.loose_bounds
    }

    /// Parameters shared by every node of this tree.
    pub fn config(&self) -> OctreeConfig<T> {
        self.node.config
    }
}

impl<D: Volume<T>, T: Scalar> Octree<D, T> {
    /// Create an empty tree covering `bounds`, with the default looseness and entry budget.
    pub fn new(bounds: Aabb3D<T>) -> Self {
        Self::with_config(bounds, OctreeConfig::default())
    }

    /// Create an empty tree covering `bounds` with explicit parameters.
    ///
    /// A looseness at or below `1.0` is kept and yields a strict octree. A
    /// `max_entries` of zero is raised to one. Use [`Octree::try_with_config`]
    /// to reject such values instead.
    pub fn with_config(bounds: Aabb3D<T>, mut config: OctreeConfig<T>) -> Self {
        if config.max_entries == 0 {
            tracing::warn!("octree max_entries of 0 raised to 1");
            config.max_entries = 1;
        }
        if !config.is_loose() {
            tracing::debug!(
                looseness = T::to_f64(config.looseness),
                "octree looseness <= 1; building a strict octree"
            );
        }
        Self::leaf(bounds, config, 0)
    }

    /// Create an empty tree covering `bounds`, validating the parameters first.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`OctreeConfig::validate`].
    pub fn try_with_config(
        bounds: Aabb3D<T>,
        config: OctreeConfig<T>,
    ) -> Result<Self, ConfigError> {
        config.validate(&bounds)?;
        Ok(Self::leaf(bounds, config, 0))
    }

    fn leaf(bounds: Aabb3D<T>, config: OctreeConfig<T>, level: usize) -> Self {
        Self {
            node: Arc::new(Node {
                bounds,
                loose_bounds: bounds.grow(config.looseness),
                config,
                level,
                children: None,
                entries: Vec::new().into(),
            }),
        }
    }

    /// A node with this node's geometry and config but new contents.
    fn rebuild(&self, children: Option<Children<D, T>>, entries: Arc<[D]>) -> Self {
        Self {
            node: Arc::new(Node {
                bounds: self.node.bounds,
                loose_bounds: self.node.loose_bounds,
                config: self.node.config,
                level: self.node.level,
                children,
                entries,
            }),
        }
    }

    fn with_entries(&self, entries: Arc<[D]>) -> Self {
        self.rebuild(self.node.children.clone(), entries)
    }

    fn with_children(&self, children: [Self; Octant::COUNT]) -> Self {
        self.rebuild(Some(Arc::new(children)), Arc::clone(&self.node.entries))
    }

    fn is_full(&self) -> bool {
        self.node.entries.len() >= self.node.config.max_entries
    }

    /// Whether this node sits above the configured depth limit.
    fn can_split(&self) -> bool {
        self.node.level < self.node.config.max_depth
    }

    fn accepts(&self, placement: &Placement<T>) -> bool {
        placement.fits(&self.node.bounds, &self.node.loose_bounds)
    }

    /// Every stored entry whose bounds intersect `query`, in unspecified order.
    ///
    /// Children are skipped only when their loose bounds miss `query`, so no
    /// matching entry is ever left out.
    pub fn select(&self, query: &Aabb3D<T>) -> Vec<&D> {
        let mut out = Vec::new();
        self.select_into(query, &mut out);
        out
    }

    /// Like [`Octree::select`], appending to `out` instead of allocating.
    pub fn select_into<'a>(&'a self, query: &Aabb3D<T>, out: &mut Vec<&'a D>) {
        out.extend(
            self.node
                .entries
                .iter()
                .filter(|e| e.bounds().intersects(query)),
        );
        if let Some(children) = self.children() {
            for child in children {
                if child.node.loose_bounds.intersects(query) {
                    child.select_into(query, out);
                }
            }
        }
    }

    /// Every stored entry whose bounds contain the point.
    pub fn select_point(&self, x: T, y: T, z: T) -> Vec<&D> {
        let mut out = Vec::new();
        self.select_point_into(x, y, z, &mut out);
        out
    }

    fn select_point_into<'a>(&'a self, x: T, y: T, z: T, out: &mut Vec<&'a D>) {
        out.extend(
            self.node
                .entries
                .iter()
                .filter(|e| e.bounds().contains_point(x, y, z)),
        );
        if let Some(children) = self.children() {
            for child in children {
                if child.node.loose_bounds.contains_point(x, y, z) {
                    child.select_point_into(x, y, z, out);
                }
            }
        }
    }

    /// Index of the child that an entry with this placement descends into, if any.
    ///
    /// This is the first child in octant order that accepts it; insertion and
    /// deletion both rely on this choice being deterministic.
    fn accepting_child(
        children: &[Self; Octant::COUNT],
        placement: &Placement<T>,
    ) -> Option<usize> {
        children.iter().position(|child| child.accepts(placement))
    }
}

impl<D: Volume<T> + PartialEq, T: Scalar> Octree<D, T> {
    /// Whether an entry equal to `entry` is stored in the tree.
    ///
    /// Follows the same single path from the root that [`Octree::delete`] does.
    pub fn contains(&self, entry: &D) -> bool {
        let placement = Placement::of(entry);
        let mut current = self;
        loop {
            if current.entries().iter().any(|e| e == entry) {
                return true;
            }
            let Some(children) = current.children() else {
                return false;
            };
            match Self::accepting_child(children, &placement) {
                Some(i) => current = &children[i],
                None => return false,
            }
        }
    }
}

impl<D: Volume<T> + Clone, T: Scalar> Octree<D, T> {
    /// Insert one entry, returning the updated tree.
    ///
    /// If the entry's center lies outside this node's bounds, or its extent
    /// outside the loose bounds, nothing is inserted and the returned handle is
    /// identical to `self`.
    #[must_use]
    pub fn insert(&self, entry: D) -> Self {
        let placement = Placement::of(&entry);
        if !self.accepts(&placement) {
            return self.clone();
        }
        self.place(entry, &placement)
    }

    /// Store an entry this node is known to accept.
    fn place(&self, entry: D, placement: &Placement<T>) -> Self {
        if !self.is_full() {
            return self.with_entries(append(&self.node.entries, [entry]));
        }
        match self.children() {
            None if self.can_split() => self.split(Some((entry, *placement))),
            None => self.with_entries(append(&self.node.entries, [entry])),
            Some(children) => self.place_in_child(children, entry, placement),
        }
    }

    /// Push an entry into the first accepting child, or keep it here if none does.
    fn place_in_child(
        &self,
        children: &[Self; Octant::COUNT],
        entry: D,
        placement: &Placement<T>,
    ) -> Self {
        match Self::accepting_child(children, placement) {
            Some(i) => {
                let mut children = children.clone();
                children[i] = children[i].place(entry, placement);
                self.with_children(children)
            }
            None => self.with_entries(append(&self.node.entries, [entry])),
        }
    }

    /// Turn a leaf into an internal node with eight empty children.
    ///
    /// Existing entries are offered to the children in order; each goes into
    /// the first child that accepts it. A leaf holds at most `max_entries`, so
    /// no child splits here. The `pending` entry that triggered the split then
    /// descends only if its child still has room. Everything else stays at
    /// this node.
    fn split(&self, pending: Option<(D, Placement<T>)>) -> Self {
        let config = self.node.config;
        let bounds = self.node.bounds;
        let level = self.node.level + 1;
        let mut children: [Self; Octant::COUNT] =
            core::array::from_fn(|i| Self::leaf(bounds.octant(Octant::ALL[i]), config, level));
        let mut residual = Vec::new();

        for entry in self.node.entries.iter() {
            let placement = Placement::of(entry);
            match Self::accepting_child(&children, &placement) {
                Some(i) => children[i] = children[i].place(entry.clone(), &placement),
                None => residual.push(entry.clone()),
            }
        }
        if let Some((entry, placement)) = pending {
            match Self::accepting_child(&children, &placement) {
                // Never split a child here.
                Some(i) if !children[i].is_full() => {
                    children[i] = children[i].place(entry, &placement);
                }
                _ => residual.push(entry),
            }
        }

        tracing::trace!(
            bounds = %bounds,
            level = self.node.level,
            entries = self.node.entries.len(),
            residual = residual.len(),
            "split octree node"
        );
        self.rebuild(Some(Arc::new(children)), residual.into())
    }

    /// Insert many entries at once, returning the updated tree.
    ///
    /// The outcome matches inserting the entries one at a time in the sense
    /// that the same entries end up stored: entries the root does not accept
    /// are skipped. The shape may differ because a node's own spare capacity is
    /// filled before anything is routed to its children.
    ///
    /// Returns a handle identical to `self` if nothing was inserted.
    #[must_use]
    pub fn insert_all<I: IntoIterator<Item = D>>(&self, data: I) -> Self {
        let mut skipped = 0_usize;
        let accepted: Vec<D> = data
            .into_iter()
            .filter(|e| {
                let fits = self.accepts(&Placement::of(e));
                if !fits {
                    skipped += 1;
                }
                fits
            })
            .collect();
        if skipped > 0 {
            tracing::debug!(
                skipped,
                accepted = accepted.len(),
                "entries outside octree bounds skipped"
            );
        }
        self.insert_data(accepted)
    }

    /// Batch insertion of entries this node is known to accept.
    fn insert_data(&self, mut data: Vec<D>) -> Self {
        if data.is_empty() {
            return self.clone();
        }
        let len = self.node.entries.len();
        let max = self.node.config.max_entries;
        if self.is_leaf() {
            if len + data.len() > max && self.can_split() {
                self.split(None).insert_data(data)
            } else {
                self.with_entries(append(&self.node.entries, data))
            }
        } else if len < max {
            let rest = data.split_off((max - len).min(data.len()));
            self.with_entries(append(&self.node.entries, data))
                .insert_children(rest)
        } else {
            self.insert_children(data)
        }
    }

    /// Route entries to the children that accept them; keep the rest here.
    fn insert_children(&self, data: Vec<D>) -> Self {
        if data.is_empty() {
            return self.clone();
        }
        let Some(children) = self.children() else {
            return self.with_entries(append(&self.node.entries, data));
        };
        let mut children = children.clone();
        let mut remaining: Vec<(D, Placement<T>)> = data
            .into_iter()
            .map(|e| {
                let p = Placement::of(&e);
                (e, p)
            })
            .collect();

        for child in &mut children {
            let (fits, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|(_, p)| child.accepts(p));
            remaining = rest;
            if !fits.is_empty() {
                *child = child.insert_data(fits.into_iter().map(|(e, _)| e).collect());
            }
        }

        let orphans: Vec<D> = remaining.into_iter().map(|(e, _)| e).collect();
        let entries = if orphans.is_empty() {
            Arc::clone(&self.node.entries)
        } else {
            append(&self.node.entries, orphans)
        };
        self.rebuild(Some(Arc::new(children)), entries)
    }
}

impl<D: Volume<T> + Clone + PartialEq, T: Scalar> Octree<D, T> {
    /// Remove one entry equal to `entry`, returning the updated tree.
    ///
    /// Nodes are never merged and the depth never shrinks. If no equal entry
    /// is found the returned handle is identical to `self`.
    #[must_use]
    pub fn delete(&self, entry: &D) -> Self {
        if let Some(index) = self.node.entries.iter().position(|e| e == entry) {
            let entries: Vec<D> = self.node.entries[..index]
                .iter()
                .chain(&self.node.entries[index + 1..])
                .cloned()
                .collect();
            return self.with_entries(entries.into());
        }

        let placement = Placement::of(entry);
        if let Some(children) = self.children()
            && let Some(i) = Self::accepting_child(children, &placement)
        {
            let updated = children[i].delete(entry);
            if !Self::ptr_eq(&updated, &children[i]) {
                let mut children = children.clone();
                children[i] = updated;
                return self.with_children(children);
            }
        }
        self.clone()
    }
}

fn append<D: Clone>(existing: &[D], extra: impl IntoIterator<Item = D>) -> Arc<[D]> {
    let extra = extra.into_iter();
    let mut out = Vec::with_capacity(existing.len() + extra.size_hint().0);
    out.extend_from_slice(existing);
    out.extend(extra);
    out.into()
}

/// Depth-first iterator over the entries of an [`Octree`].
///
/// Created by [`Octree::iter`].
pub struct Iter<'a, D, T> {
    stack: Vec<&'a Octree<D, T>>,
    current: core::slice::Iter<'a, D>,
}

impl<D, T> Debug for Iter<'_, D, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("pending_nodes", &self.stack.len())
            .field("pending_entries", &self.current.len())
            .finish()
    }
}

impl<'a, D, T> Iterator for Iter<'a, D, T> {
    type Item = &'a D;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.current.next() {
                return Some(e);
            }
            let node = self.stack.pop()?;
            self.current = node.node.entries.iter();
            if let Some(children) = node.children() {
                self.stack.extend(children.iter().rev());
            }
        }
    }
}

impl<'a, D, T> IntoIterator for &'a Octree<D, T> {
    type Item = &'a D;
    type IntoIter = Iter<'a, D, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
