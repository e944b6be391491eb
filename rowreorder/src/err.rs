//! Bale Serial Rowreorder error library
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use sparsemat::SparseMatError;
use std::error;
use std::fmt;

/// Errors from reordering and intersecting rows
#[derive(Debug)]
pub enum ReorderError {
    /// the row is not in the affinity heap, it was already placed or never existed
    NotQueued(usize),
    /// the affinity heap emptied before every row was placed, at this step
    HeapExhausted(usize),
    /// a row, seed or thread count that does not fit the matrix
    InvalidArgument(String),
    /// trouble from the sparse matrix library
    Sparsemat(SparseMatError),
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ReorderError::NotQueued(row) => {
                write!(f, "row {} is not queued in the affinity heap", row)
            }
            ReorderError::HeapExhausted(step) => write!(
                f,
                "affinity heap invariant broken: empty at placement step {}",
                step
            ),
            ReorderError::InvalidArgument(ref msg) => write!(f, "invalid argument: {}", msg),
            ReorderError::Sparsemat(ref e) => e.fmt(f),
        }
    }
}

impl error::Error for ReorderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ReorderError::NotQueued(_) => None,
            ReorderError::HeapExhausted(_) => None,
            ReorderError::InvalidArgument(_) => None,
            ReorderError::Sparsemat(ref e) => Some(e),
        }
    }
}

impl From<SparseMatError> for ReorderError {
    fn from(err: SparseMatError) -> ReorderError {
        ReorderError::Sparsemat(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for ReorderError {
    fn from(err: rayon::ThreadPoolBuildError) -> ReorderError {
        ReorderError::InvalidArgument(format!("thread pool: {}", err))
    }
}
