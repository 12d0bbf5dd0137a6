// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree snapshots.
//!
//! One writer publishes new versions of a tree while readers on other threads
//! query whatever version they grabbed, without locking the tree itself.
//!
//! Run:
//! - `cargo run -p understory_octree_demos --example octree_snapshots`

use std::sync::{Arc, RwLock};
use std::thread;

use understory_octree::{Aabb3D, Octree};

type Entry = (Aabb3D<f64>, u32);

fn main() {
    let world = Aabb3D::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
    let current = Arc::new(RwLock::new(Octree::<Entry>::new(world)));

    let writer = {
        let current = Arc::clone(&current);
        thread::spawn(move || {
            for i in 0..1000_u32 {
                let x = f64::from(i % 100);
                let y = f64::from((i / 10) % 100);
                let entry = (Aabb3D::cube([x, y, 50.0], 0.5), i);
                // Single writer: build the next version outside the lock, then publish it.
                let next = current.read().unwrap().insert(entry);
                *current.write().unwrap() = next;
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|r| {
            let current = Arc::clone(&current);
            thread::spawn(move || {
                let mut seen = 0;
                for _ in 0..50 {
                    let snapshot = current.read().unwrap().clone();
                    let n = snapshot.select(&world).len();
                    assert!(n >= seen, "published versions only grow");
                    seen = n;
                }
                println!("reader {r} last saw {seen} entries");
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    let tree = current.read().unwrap().clone();
    println!("{tree}");
    println!(
        "size={} nodes={} depth={} busiest node={}",
        tree.size(),
        tree.node_count(),
        tree.depth(),
        tree.max_entries()
    );
}
