#![warn(
    missing_docs,
    future_incompatible,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! Bale Serial Rowreorder application
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use clap::{App, Arg};
use itertools::join;
use rowreorder::RowIntersect;
use rowreorder::RowReorder;
use rowreorder::{DEFAULT_SEED_ROW, DEFAULT_WINDOW};
use sparsemat::Perm;
use sparsemat::SparseMat;

// Demo application that reorders the rows of a sparse matrix so that
// rows next to each other tend to share nonzero columns, then counts
// the columns shared by a pair of rows.
//
// Reordering is greedy.  Starting from a seed row, every row not yet
// placed carries an affinity: the number of columns it has in common
// with the last `window` placed rows.  The row with the largest
// affinity is placed next, its columns are added to everybody's
// affinity and the columns of the row that just fell out of the
// window are taken away.  An indexed heap keeps those updates at
// O(log n) each.
//
// The intersection is a brute force comparison of every column of one
// row with every column of the other, spread over a rayon pool.

fn main() {
    env_logger::init();

    let matches = App::new("RowReorder")
        .version("0.1.0")
        .about("Implements a test of greedy affinity row reordering")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .conflicts_with("matrix_market")
                .help("Read the matrix from a .csr file"),
        )
        .arg(
            Arg::with_name("matrix_market")
                .short("m")
                .long("matrix_market")
                .takes_value(true)
                .help("Read the matrix from a MatrixMarket file"),
        )
        .arg(
            Arg::with_name("numrows")
                .short("n")
                .long("numrows")
                .takes_value(true)
                .help("The number of rows in the random test matrix"),
        )
        .arg(
            Arg::with_name("numcols")
                .short("c")
                .long("numcols")
                .takes_value(true)
                .help("The number of columns in the random test matrix (default numrows)"),
        )
        .arg(
            Arg::with_name("density")
                .short("p")
                .long("density")
                .takes_value(true)
                .help("Percent chance that an entry of the random test matrix is nonzero"),
        )
        .arg(
            Arg::with_name("rng_seed")
                .short("S")
                .long("rng_seed")
                .takes_value(true)
                .help("Seed for the random test matrix"),
        )
        .arg(
            Arg::with_name("shuffle")
                .short("x")
                .long("shuffle")
                .takes_value(false)
                .help("Shuffle the rows of the input (seeded by rng_seed) before reordering"),
        )
        .arg(
            Arg::with_name("window")
                .short("w")
                .long("window")
                .takes_value(true)
                .help("The number of placed rows that contribute to affinity"),
        )
        .arg(
            Arg::with_name("seed_row")
                .short("s")
                .long("seed_row")
                .takes_value(true)
                .help("The row placed first"),
        )
        .arg(
            Arg::with_name("row_a")
                .short("a")
                .long("row_a")
                .takes_value(true)
                .help("First row to intersect"),
        )
        .arg(
            Arg::with_name("row_b")
                .short("b")
                .long("row_b")
                .takes_value(true)
                .help("Second row to intersect"),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .takes_value(true)
                .help("Threads for the intersection, 0 lets rayon decide"),
        )
        .arg(
            Arg::with_name("perm_out")
                .short("o")
                .long("perm_out")
                .takes_value(true)
                .help("Write the row permutation to this file"),
        )
        .arg(
            Arg::with_name("write_csr")
                .short("W")
                .long("write_csr")
                .takes_value(true)
                .help("Write the reordered matrix to this .csr file"),
        )
        .arg(
            Arg::with_name("dump_files")
                .short("d")
                .long("dump_files")
                .takes_value(false)
                .help("Produce short dumps as the algorithm progresses"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .takes_value(false)
                .help("produce less chatty output"),
        )
        .get_matches();

    let numrows: usize = matches
        .value_of("numrows")
        .unwrap_or("1000")
        .parse()
        .expect("numrows: not an integer");
    let numcols: usize = match matches.value_of("numcols") {
        Some(c) => c.parse().expect("numcols: not an integer"),
        None => numrows,
    };
    let density: f64 = matches
        .value_of("density")
        .unwrap_or("1.0")
        .parse()
        .expect("density: not a float");
    let rng_seed: u64 = matches
        .value_of("rng_seed")
        .unwrap_or("12346")
        .parse()
        .expect("rng_seed: not an integer");
    let window: usize = match matches.value_of("window") {
        Some(w) => w.parse().expect("window: not a non-negative integer"),
        None => DEFAULT_WINDOW,
    };
    let seed_row: usize = match matches.value_of("seed_row") {
        Some(s) => s.parse().expect("seed_row: not an integer"),
        None => DEFAULT_SEED_ROW,
    };
    let row_a: usize = matches
        .value_of("row_a")
        .unwrap_or("0")
        .parse()
        .expect("row_a: not an integer");
    let row_b: usize = matches
        .value_of("row_b")
        .unwrap_or("1")
        .parse()
        .expect("row_b: not an integer");
    let threads: usize = matches
        .value_of("threads")
        .unwrap_or("0")
        .parse()
        .expect("threads: not an integer");

    let quiet = matches.is_present("quiet");
    let dump_files = matches.is_present("dump_files");

    rowreorder::init_thread_pool(threads).expect("could not build the rayon thread pool");

    let mat = if let Some(filename) = matches.value_of("input") {
        if !quiet {
            println!("reading {}", filename);
        }
        SparseMat::read_csr_file(filename).expect("could not read the .csr file")
    } else if let Some(filename) = matches.value_of("matrix_market") {
        if !quiet {
            println!("reading {}", filename);
        }
        SparseMat::read_mm_file(filename).expect("could not read the MatrixMarket file")
    } else {
        if !quiet {
            println!(
                "creating a random {} x {} matrix with density {}%",
                numrows, numcols, density
            );
        }
        SparseMat::random_csr(numrows, numcols, density, rng_seed)
    };

    let mat = if matches.is_present("shuffle") {
        if !quiet {
            println!("shuffling the rows with seed {}", rng_seed);
        }
        mat.permute_rows(&Perm::random(mat.numrows(), rng_seed))
            .expect("could not shuffle the rows")
    } else {
        mat
    };

    if !quiet {
        println!("input matrix stats:");
        mat.stats();
    }

    if dump_files {
        mat.dump(20, "mat.out").expect("could not write mat.out");
    }

    if !quiet {
        print!("Running row_reorder (window {}, seed row {}): ", window, seed_row);
    }
    let info = mat
        .row_reorder(seed_row, window)
        .expect("row_reorder failed");
    if !mat.check_result(&info) {
        println!("ERROR: check_result failed");
    }
    if !quiet {
        println!("{} seconds", info.laptime);
        println!(
            "   {} increments, {} decrements",
            info.increments, info.decrements
        );
        if info.perm.len() <= 20 {
            println!("   perm: {}", join(info.perm.as_slice(), " "));
        }
    }

    if dump_files {
        info.perm
            .dump(20, "perm.out")
            .expect("could not write perm.out");
    }
    if let Some(filename) = matches.value_of("perm_out") {
        info.perm
            .write_perm_file(filename)
            .expect("could not write the permutation");
    }
    if let Some(filename) = matches.value_of("write_csr") {
        let pmat = mat
            .permute_rows(&info.perm)
            .expect("could not apply the permutation");
        pmat.write_csr_file(filename)
            .expect("could not write the reordered matrix");
    }

    if mat.numrows() > row_a.max(row_b) {
        if !quiet {
            print!("Running row_intersection on rows {} and {}: ", row_a, row_b);
        }
        let par = mat
            .row_intersection(row_a, row_b)
            .expect("row_intersection failed");
        let ser = mat
            .row_intersection_serial(row_a, row_b)
            .expect("row_intersection_serial failed");
        if par.count != ser.count {
            println!(
                "ERROR: parallel count {} != serial count {}",
                par.count, ser.count
            );
        }
        if !quiet {
            println!("{} seconds", par.laptime);
            println!(
                "   {} shared columns out of {} combinations",
                par.count, par.combinations
            );
        } else {
            println!("{}", par.count);
        }
    } else if !quiet {
        println!(
            "skipping row_intersection, rows {} and {} not both in the matrix",
            row_a, row_b
        );
    }
}
