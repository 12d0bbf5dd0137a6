// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree basics.
//!
//! Build a small tree, watch it split, query it, and delete from it.
//!
//! Run:
//! - `cargo run -p understory_octree_demos --example octree_basics`

use understory_octree::{Aabb3D, Octant, Octree, OctreeConfig};

fn main() {
    let world = Aabb3D::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
    let empty: Octree<(Aabb3D<f64>, &str)> =
        Octree::with_config(world, OctreeConfig::new(1.5, 4));

    // Three boxes near the low corner, two near the high corner.
    let tree = [
        ([10.0, 10.0, 10.0], "a"),
        ([20.0, 15.0, 10.0], "b"),
        ([12.0, 30.0, 25.0], "c"),
        ([80.0, 80.0, 80.0], "d"),
        ([70.0, 90.0, 75.0], "e"),
    ]
    .into_iter()
    .fold(empty.clone(), |t, (center, name)| {
        t.insert((Aabb3D::cube(center, 1.0), name))
    });

    println!("{tree}");
    for octant in [Octant::empty(), Octant::all()] {
        let child = tree.child(octant).unwrap();
        let names: Vec<_> = child.entries().iter().map(|(_, n)| *n).collect();
        println!("  {octant:?}: {names:?}");
    }
    assert_eq!(tree.depth(), 1, "five entries split a four-entry root");

    let low = Aabb3D::new(0.0, 0.0, 0.0, 40.0, 40.0, 40.0);
    let hits: Vec<_> = tree.select(&low).into_iter().map(|(_, n)| *n).collect();
    println!("select {low}: {hits:?}");
    assert_eq!(hits.len(), 3);

    // Deleting does not shrink the tree.
    let smaller = tree.delete(&(Aabb3D::cube([80.0, 80.0, 80.0], 1.0), "d"));
    println!("after delete: size={} depth={}", smaller.size(), smaller.depth());

    // The earlier versions are untouched.
    println!("empty: size={}, tree: size={}", empty.size(), tree.size());
}
