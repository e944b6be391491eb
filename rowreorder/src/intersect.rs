//! Parallel count of the columns two rows have in common
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
use log::debug;
use rayon::prelude::*;
use sparsemat::wall_seconds;
use sparsemat::SparseMat;

/// Information that comes from intersecting two rows
#[derive(Debug, Clone)]
pub struct IntersectInfo {
    /// number of columns the rows share
    pub count: u64,
    /// number of (column, column) pairs compared
    pub combinations: u64,
    /// time to find
    pub laptime: f64,
}

/// A trait to extend SparseMat for row intersection
pub trait RowIntersect {
    /// brute force parallel intersection of two rows
    fn row_intersection(&self, r0: usize, r1: usize) -> Result<IntersectInfo, ReorderError>;
    /// merge based serial intersection of two rows
    fn row_intersection_serial(&self, r0: usize, r1: usize)
        -> Result<IntersectInfo, ReorderError>;
}

fn check_rows(mat: &SparseMat, r0: usize, r1: usize) -> Result<(), ReorderError> {
    for &r in &[r0, r1] {
        if r >= mat.numrows() {
            return Err(ReorderError::InvalidArgument(format!(
                "row {} outside a {} row matrix",
                r,
                mat.numrows()
            )));
        }
    }
    Ok(())
}

impl RowIntersect for SparseMat {
    /// Compares every column of r0 with every column of r1.
    ///
    /// The deg(r0) * deg(r1) comparisons are spread over the rayon pool and the
    /// hits are summed, so the count does not depend on how the work was split.
    /// This is quadratic in the row degrees and only sensible for short rows.
    fn row_intersection(&self, r0: usize, r1: usize) -> Result<IntersectInfo, ReorderError> {
        check_rows(self, r0, r1)?;
        let cols0 = self.row(r0);
        let cols1 = self.row(r1);
        let d0 = cols0.len();
        let combinations = d0 * cols1.len();

        let t1 = wall_seconds()?;
        let count: u64 = (0..combinations)
            .into_par_iter()
            .map(|r| (cols0[r % d0] == cols1[r / d0]) as u64)
            .sum();
        let laptime = wall_seconds()? - t1;

        debug!(
            "rows {} and {}: {} combinations, {} shared, {} seconds",
            r0, r1, combinations, count, laptime
        );
        Ok(IntersectInfo {
            count,
            combinations: combinations as u64,
            laptime,
        })
    }

    /// Walks the two sorted rows together, the usual merge.
    fn row_intersection_serial(
        &self,
        r0: usize,
        r1: usize,
    ) -> Result<IntersectInfo, ReorderError> {
        check_rows(self, r0, r1)?;
        let cols0 = self.row(r0);
        let cols1 = self.row(r1);

        let t1 = wall_seconds()?;
        let (mut i, mut j, mut count, mut steps) = (0, 0, 0u64, 0u64);
        while i < cols0.len() && j < cols1.len() {
            steps += 1;
            if cols0[i] < cols1[j] {
                i += 1;
            } else if cols0[i] > cols1[j] {
                j += 1;
            } else {
                count += 1;
                i += 1;
                j += 1;
            }
        }
        let laptime = wall_seconds()? - t1;

        Ok(IntersectInfo {
            count,
            combinations: steps,
            laptime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn reference(mat: &SparseMat, r0: usize, r1: usize) -> u64 {
        let a: BTreeSet<usize> = mat.row(r0).iter().copied().collect();
        let b: BTreeSet<usize> = mat.row(r1).iter().copied().collect();
        a.intersection(&b).count() as u64
    }

    #[test]
    fn four_by_four() {
        let mat = SparseMat::read_csr_file("../sparsemat/good/4x4.csr").expect("failed read");
        let info = mat.row_intersection(0, 1).unwrap();
        assert_eq!(info.count, 1);
        assert_eq!(info.combinations, 4);
        assert_eq!(mat.row_intersection(0, 3).unwrap().count, 1);
        assert_eq!(mat.row_intersection(0, 2).unwrap().count, 0);
        assert_eq!(mat.row_intersection_serial(0, 1).unwrap().count, 1);
    }

    #[test]
    fn disjoint_and_identical() {
        let mat = SparseMat::from_parts(3, 10, vec![0, 3, 6, 9], vec![0, 2, 4, 1, 3, 5, 0, 2, 4], None)
            .unwrap();
        assert_eq!(mat.row_intersection(0, 1).unwrap().count, 0);
        assert_eq!(mat.row_intersection(0, 2).unwrap().count, 3);
        assert_eq!(mat.row_intersection(1, 1).unwrap().count, 3);
    }

    #[test]
    fn empty_row() {
        let mat = SparseMat::from_parts(2, 4, vec![0, 0, 2], vec![1, 3], None).unwrap();
        let info = mat.row_intersection(0, 1).unwrap();
        assert_eq!(info.count, 0);
        assert_eq!(info.combinations, 0);
        assert_eq!(mat.row_intersection(1, 0).unwrap().count, 0);
    }

    #[test]
    fn rows_out_of_range() {
        let mat = SparseMat::from_parts(2, 4, vec![0, 0, 2], vec![1, 3], None).unwrap();
        assert!(mat.row_intersection(0, 2).is_err());
        assert!(mat.row_intersection_serial(5, 0).is_err());
    }

    #[test]
    fn random_rows_match_sets() {
        let mut rng = StdRng::seed_from_u64(1234);
        for trial in 0..10 {
            let nr = rng.gen_range(2, 30);
            let nc = rng.gen_range(1, 200);
            let density = rng.gen_range(1.0, 60.0);
            let mat = SparseMat::random_csr(nr, nc, density, trial);
            for _ in 0..10 {
                let r0 = rng.gen_range(0, nr);
                let r1 = rng.gen_range(0, nr);
                let expect = reference(&mat, r0, r1);
                assert_eq!(mat.row_intersection(r0, r1).unwrap().count, expect);
                assert_eq!(mat.row_intersection_serial(r0, r1).unwrap().count, expect);
            }
        }
    }

    #[test]
    fn pool_size_does_not_matter() {
        let mat = SparseMat::random_csr(2, 2000, 40.0, 77);
        let expect = reference(&mat, 0, 1);
        for &threads in &[1, 2, 4] {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            let count = pool.install(|| mat.row_intersection(0, 1).unwrap().count);
            assert_eq!(count, expect);
        }
    }
}
