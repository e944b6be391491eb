#![warn(
    missing_docs,
    future_incompatible,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! Bale Serial Rowreorder library
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use log::debug;
use sparsemat::wall_seconds;
use sparsemat::Perm;
use sparsemat::SparseMat;

pub mod affinity;
pub mod err;
pub mod intersect;
pub mod scan;

use affinity::AffinityHeap;
pub use err::ReorderError;
pub use intersect::{IntersectInfo, RowIntersect};
use scan::{scan_row, Pass};

/// the number of placed rows whose columns still count toward affinity
pub const DEFAULT_WINDOW: usize = 10;

/// the row every reordering starts from unless told otherwise
pub const DEFAULT_SEED_ROW: usize = 0;

/// size the global rayon pool used by row_intersection, 0 lets rayon decide
pub fn init_thread_pool(threads: usize) -> Result<(), ReorderError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    Ok(())
}

/// return values used by main
#[derive(Debug, Clone)]
pub struct ReorderInfo {
    /// perm[k] is the original row placed at position k
    pub perm: Perm,
    /// the affinity each row had when it was placed, 0 for the seed
    pub affinity: Vec<i64>,
    /// the seed row, perm[0]
    pub seed: usize,
    /// heap increments made by growth passes
    pub increments: u64,
    /// heap decrements made by retirement passes
    pub decrements: u64,
    /// the time to complete
    pub laptime: f64,
}

/// a trait to extend SparseMat for greedy row reordering
pub trait RowReorder {
    /// greedily order the rows so that neighbors share columns
    fn row_reorder(&self, seed: usize, window: usize) -> Result<ReorderInfo, ReorderError>;
    /// check results
    fn check_result(&self, info: &ReorderInfo) -> bool;
}

impl RowReorder for SparseMat {
    /// Seeds the permutation with `seed`, then for k = 1..numrows
    ///  - adds the columns of row perm[k-1] to the affinity of every queued row,
    ///  - once k > window, takes away the columns of row perm[k-window-1],
    ///  - places the queued row with the highest affinity at perm[k].
    ///
    /// So a queued row's affinity is the number of (row, column) hits it has
    /// with the last `window` placed rows.  A window of 0 retires each row on
    /// the same step it is added, leaving every affinity at 0.
    /// # Arguments
    /// * seed the row placed first
    /// * window how many placed rows keep contributing
    fn row_reorder(&self, seed: usize, window: usize) -> Result<ReorderInfo, ReorderError> {
        let nr = self.numrows();
        let mut heap = AffinityHeap::new(nr, seed)?;
        let mut perm = Perm::new(nr);
        let mut affinity: Vec<i64> = vec![0; nr];

        let t1 = wall_seconds()?;

        perm.perm()[0] = seed;
        for k in 1..nr {
            let r0 = perm.entry(k - 1);
            scan_row(self, &mut heap, r0, Pass::Growth)?;

            if k > window {
                let aging = perm.entry(k - window - 1);
                scan_row(self, &mut heap, aging, Pass::Retirement)?;
            }

            let placed = heap.pop_max().ok_or(ReorderError::HeapExhausted(k))?;
            perm.perm()[k] = placed.row;
            affinity[k] = placed.affinity;
        }

        let laptime = wall_seconds()? - t1;
        debug!(
            "reordered {} rows, window {}: {} increments, {} decrements in {} seconds",
            nr,
            window,
            heap.increments(),
            heap.decrements(),
            laptime
        );

        Ok(ReorderInfo {
            perm,
            affinity,
            seed,
            increments: heap.increments(),
            decrements: heap.decrements(),
            laptime,
        })
    }

    /// check the result of row_reorder
    ///
    ///  check that the permutation is in fact a permutation of the rows
    ///  and that it starts at the seed
    fn check_result(&self, info: &ReorderInfo) -> bool {
        if info.perm.len() != self.numrows() || !info.perm.is_perm() {
            println!("perm not a permutation");
            return false;
        }
        if self.numrows() > 0 && info.perm.entry(0) != info.seed {
            println!("perm does not start at the seed row {}", info.seed);
            return false;
        }
        true
    }
}
