//! Shared column scan between a placed row and the queued rows
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use crate::affinity::AffinityHeap;
use crate::err::ReorderError;
use log::debug;
use sparsemat::SparseMat;

/// Which way a scan moves the affinities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// a row was just placed, raise the rows that share its columns
    Growth,
    /// a row left the window, take back what it added
    Retirement,
}

/// For every column c0 of row `r0` and every queued row r1 != r0, walk r1 from
/// its first column until a column past c0 and bump r1's affinity on a hit.
///
/// The walk of r1 starts over for each c0 rather than merging the two sorted
/// rows, so the cost is deg(r0) * deg(r1) per pair.  The order of the heap
/// updates (c0 outer, r1 ascending inner) decides how ties land in the heap.
///
/// Returns the number of heap updates made.
pub fn scan_row(
    mat: &SparseMat,
    heap: &mut AffinityHeap,
    r0: usize,
    pass: Pass,
) -> Result<u64, ReorderError> {
    let mut updates = 0;
    for &c0 in mat.row(r0) {
        for r1 in 0..mat.numrows() {
            if r1 == r0 || !heap.contains(r1) {
                continue;
            }
            for &c1 in mat.row(r1) {
                if c1 > c0 {
                    break;
                }
                if c1 == c0 {
                    match pass {
                        Pass::Growth => heap.increment(r1)?,
                        Pass::Retirement => heap.decrement(r1)?,
                    }
                    updates += 1;
                    break;
                }
            }
        }
    }
    debug!("{:?} pass for row {}: {} heap updates", pass, r0, updates);
    Ok(updates)
}
