//! Indexed max-heap of row affinities
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use crate::err::ReorderError;
use log::trace;

const HEAP_ROOT: usize = 0;

fn parent(i: usize) -> usize {
    (i + 1) / 2 - 1
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

fn right_child(i: usize) -> usize {
    2 * i + 2
}

/// A row that has not been placed yet and how much it has in common
/// with the rows placed recently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffinityItem {
    /// the row of the matrix
    pub row: usize,
    /// the number of columns it shares with the rows in the window
    pub affinity: i64,
}

/// A binary max-heap on affinity with a row -> slot index, so that the
/// affinity of any queued row can be raised or lowered in O(log n).
///
/// Rows with equal affinity come out in whatever order the heap shape
/// gives, there is no secondary key.
#[derive(Debug, Clone)]
pub struct AffinityHeap {
    items: Vec<AffinityItem>,
    // None once the row is placed (or for the seed, which never enters)
    position: Vec<Option<usize>>,
    increments: u64,
    decrements: u64,
}

impl AffinityHeap {
    /// a heap holding every row of a `numrows` matrix except `seed`, all with affinity 0
    pub fn new(numrows: usize, seed: usize) -> Result<AffinityHeap, ReorderError> {
        if seed >= numrows {
            return Err(ReorderError::InvalidArgument(format!(
                "seed row {} outside a {} row matrix",
                seed, numrows
            )));
        }
        let mut items = Vec::with_capacity(numrows - 1);
        let mut position = vec![None; numrows];
        for row in (0..numrows).filter(|&r| r != seed) {
            position[row] = Some(items.len());
            items.push(AffinityItem { row, affinity: 0 });
        }
        Ok(AffinityHeap {
            items,
            position,
            increments: 0,
            decrements: 0,
        })
    }

    /// the number of rows still queued
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// true when every row has been placed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// is this row still queued
    pub fn contains(&self, row: usize) -> bool {
        self.slot(row).is_some()
    }

    /// the current affinity of a queued row
    pub fn affinity(&self, row: usize) -> Option<i64> {
        self.slot(row).map(|i| self.items[i].affinity)
    }

    /// the row that `pop_max` would return
    pub fn peek(&self) -> Option<&AffinityItem> {
        self.items.first()
    }

    /// the number of successful calls to `increment`
    pub fn increments(&self) -> u64 {
        self.increments
    }

    /// the number of successful calls to `decrement`
    pub fn decrements(&self) -> u64 {
        self.decrements
    }

    fn slot(&self, row: usize) -> Option<usize> {
        self.position.get(row).copied().flatten()
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.items.swap(i, j);
        self.position[self.items[i].row] = Some(i);
        self.position[self.items[j].row] = Some(j);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > HEAP_ROOT && self.items[i].affinity > self.items[parent(i)].affinity {
            self.swap(i, parent(i));
            i = parent(i);
        }
    }

    // Picks the larger child, the left one when they tie.
    fn sift_down(&mut self, mut i: usize) {
        let size = self.items.len();
        while left_child(i) < size {
            let l = left_child(i);
            let r = right_child(i);
            let c = if r < size && self.items[r].affinity > self.items[l].affinity {
                r
            } else {
                l
            };
            if self.items[i].affinity < self.items[c].affinity {
                self.swap(i, c);
                i = c;
            } else {
                break;
            }
        }
    }

    /// add one to the affinity of a queued row
    pub fn increment(&mut self, row: usize) -> Result<(), ReorderError> {
        let i = self.slot(row).ok_or(ReorderError::NotQueued(row))?;
        self.items[i].affinity += 1;
        trace!("increment row {} to {}", row, self.items[i].affinity);
        self.sift_up(i);
        self.increments += 1;
        Ok(())
    }

    /// take one from the affinity of a queued row
    pub fn decrement(&mut self, row: usize) -> Result<(), ReorderError> {
        let i = self.slot(row).ok_or(ReorderError::NotQueued(row))?;
        self.items[i].affinity -= 1;
        trace!("decrement row {} to {}", row, self.items[i].affinity);
        self.sift_down(i);
        self.decrements += 1;
        Ok(())
    }

    /// remove the row with the highest affinity and mark it placed
    pub fn pop_max(&mut self) -> Option<AffinityItem> {
        if self.items.is_empty() {
            return None;
        }
        let top = self.items.swap_remove(HEAP_ROOT);
        self.position[top.row] = None;
        if let Some(moved) = self.items.first().map(|item| item.row) {
            self.position[moved] = Some(HEAP_ROOT);
            self.sift_down(HEAP_ROOT);
        }
        trace!("pop row {} with affinity {}", top.row, top.affinity);
        Some(top)
    }
}
