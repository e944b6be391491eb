#![warn(
    missing_docs,
    future_incompatible,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! Bale Serial Sparsemat library
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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, Write};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::str::FromStr;

/// Our own error handling for bad matrices and bad input files
pub mod err;
use err::SparseMatError::Sparsemat;
pub use err::{ParseCsrError, ParseMmError, SparseMatError};

/// Generic result return in this library
pub type Result<T> = std::result::Result<T, SparseMatError>;

// the most entries a reader reserves up front from a header count
const MAX_PRESIZE: usize = 1 << 20;

/// A structure to hold a sparse matrix in compressed sparse row form
#[derive(Debug, Clone)]
pub struct SparseMat {
    numrows: usize, // the total number of rows in the matrix
    numcols: usize, // the nonzeros have values between 0 and numcols
    nnz: usize,     // total number of nonzeros in the matrix
    /// the row offsets into the arrays nonzeros and values, size is nrows+1,
    /// offset[nrows] is nnz
    pub offset: Vec<usize>,
    /// The nonzero column indicies, strictly increasing within a row
    pub nonzero: Vec<usize>,
    /// The values, if present
    pub value: Option<Vec<f64>>,
}

use std::time::{SystemTime, UNIX_EPOCH};
/// A routine to give access to the wall clock timer on most UNIX-like systems.
///    Uses rust's SystemTime.
pub fn wall_seconds() -> Result<f64> {
    let n = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(n.as_secs_f64())
}

/// A permutation, `perm[i] = j` means position i holds item j
#[derive(Debug, Clone, PartialEq)]
pub struct Perm {
    perm: Vec<usize>,
}

use rand::seq::SliceRandom;

impl Perm {
    /// a new (identity) permutation of some size
    pub fn new(n: usize) -> Perm {
        let perm: Vec<usize> = (0..n).collect();
        Perm { perm }
    }

    /// wrap an existing array, use `is_perm` to check it
    pub fn from_vec(perm: Vec<usize>) -> Perm {
        Perm { perm }
    }

    /// Get the length of this permutation
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    /// true for the permutation of nothing
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// get the entry from a permutation
    pub fn entry(&self, index: usize) -> usize {
        self.perm[index]
    }

    /// get a reference to the permutation itself
    pub fn perm(&mut self) -> &mut Vec<usize> {
        &mut self.perm
    }

    /// read only view of the entries
    pub fn as_slice(&self) -> &[usize] {
        &self.perm
    }

    /// create a uniform random permutation
    /// # Arguments
    /// * n the length of the permutation
    /// * seed seed for the random number generator
    ///
    /// Rust suffle implements the standard serial algorithm, known at least as
    ///     Fisher-Yates or Knuth shuffle, to generate the uniform permutation.
    pub fn random(n: usize, seed: u64) -> Perm {
        let mut ret = Perm::new(n);
        let mut rng = StdRng::seed_from_u64(seed);
        ret.perm.shuffle(&mut rng);
        ret
    }

    /// create a permutation which will reverse the given perm
    pub fn inverse(&self) -> Perm {
        let mut ret = Perm::new(self.perm.len());
        for (i, &p) in self.perm.iter().enumerate() {
            ret.perm[p] = i;
        }
        ret
    }

    /// checks that an array is in fact a permutation
    ///
    ///Every element in the flag array will equal 1 iff perm is a permutation.
    pub fn is_perm(&self) -> bool {
        let len: usize = self.perm.len();
        let mut flag: Vec<usize> = vec![0; len];

        for entry in &self.perm {
            if *entry >= len {
                return false;
            }
            flag[*entry] += 1;
        }

        flag.iter().all(|&f| f == 1)
    }

    /// writes the first and last part of an perm to the specified file
    /// # Arguments
    /// * maxdisp the number of entries that are written, 0 means everything,
    ///            otherwise write the first and last maxdisp/2 entries (at least one each)
    /// * filename the filename to written to
    pub fn dump(&self, maxdisp: usize, filename: &str) -> Result<()> {
        let path = Path::new(&filename);
        let mut file = BufWriter::new(File::create(path)?);

        if maxdisp == 0 || maxdisp >= self.perm.len() {
            for entry in &self.perm {
                writeln!(file, "{}", entry)?;
            }
            return Ok(());
        }

        let half = std::cmp::max(1, maxdisp / 2);
        for entry in &self.perm[0..half] {
            writeln!(file, "{}", entry)?;
        }
        writeln!(file, "...")?;
        for entry in &self.perm[self.perm.len() - half..] {
            writeln!(file, "{}", entry)?;
        }
        Ok(())
    }

    /// writes the whole permutation, one entry per line
    pub fn write_perm_file(&self, filename: &str) -> Result<()> {
        self.dump(0, filename)
    }
}

/// parse one whitespace trimmed token of a .csr file, remembering where it was
fn csr_token<T: FromStr>(tok: &str, line: usize, what: &str) -> Result<T> {
    tok.parse::<T>().map_err(|_| {
        ParseCsrError::new(line, format!("expected {} but found '{}'", what, tok)).into()
    })
}

fn csr_err(line: usize, msg: String) -> SparseMatError {
    ParseCsrError::new(line, msg).into()
}

impl SparseMat {
    /// a new sparse matrix without values
    pub fn new(numrows: usize, numcols: usize, nnz: usize) -> SparseMat {
        let offset: Vec<usize> = vec![0; numrows + 1];
        let nonzero: Vec<usize> = vec![0; nnz];
        SparseMat {
            numrows,
            numcols,
            nnz,
            offset,
            nonzero,
            value: None,
        }
    }

    /// build a matrix from its raw CSR arrays and check that they are consistent
    /// # Arguments
    /// * numrows, numcols the shape
    /// * offset row offsets, length numrows+1
    /// * nonzero column indices, strictly increasing within each row
    /// * value optional values, same length as nonzero
    pub fn from_parts(
        numrows: usize,
        numcols: usize,
        offset: Vec<usize>,
        nonzero: Vec<usize>,
        value: Option<Vec<f64>>,
    ) -> Result<SparseMat> {
        let mat = SparseMat {
            numrows,
            numcols,
            nnz: nonzero.len(),
            offset,
            nonzero,
            value,
        };
        mat.validate()?;
        Ok(mat)
    }

    /// check the CSR invariants, the core algorithms trust them
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(SparseMatError::InvalidArgument(msg));

        if self.offset.len().checked_sub(1) != Some(self.numrows) {
            return bad(format!(
                "offset has length {} for {} rows",
                self.offset.len(),
                self.numrows
            ));
        }
        if self.offset[0] != 0 {
            return bad(format!("offset[0] is {}, expected 0", self.offset[0]));
        }
        if self.nonzero.len() != self.nnz || self.offset[self.numrows] != self.nnz {
            return bad(format!(
                "offset[{}] = {} but there are {} nonzeros",
                self.numrows,
                self.offset[self.numrows],
                self.nonzero.len()
            ));
        }
        if let Some(row) = (0..self.numrows).find(|&r| self.offset[r] > self.offset[r + 1]) {
            return bad(format!("offsets decrease at row {}", row));
        }
        if let Some(value) = &self.value {
            if value.len() != self.nnz {
                return bad(format!(
                    "{} values for {} nonzeros",
                    value.len(),
                    self.nnz
                ));
            }
        }
        for row in 0..self.numrows {
            let cols = self.row(row);
            for (k, &col) in cols.iter().enumerate() {
                if col >= self.numcols {
                    return bad(format!(
                        "row {} has column {} outside [0, {})",
                        row, col, self.numcols
                    ));
                }
                if k > 0 && cols[k - 1] >= col {
                    return bad(format!(
                        "row {} columns not strictly increasing at {}",
                        row, col
                    ));
                }
            }
        }
        Ok(())
    }

    /// inspector fn for numrows
    pub fn numrows(&self) -> usize {
        self.numrows
    }

    /// inspector fn for numcols
    pub fn numcols(&self) -> usize {
        self.numcols
    }

    /// inspector fn for nnz
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// the column indices of one row
    pub fn row(&self, row: usize) -> &[usize] {
        &self.nonzero[self.offset[row]..self.offset[row + 1]]
    }

    /// the number of nonzeros in one row
    pub fn degree(&self, row: usize) -> usize {
        self.offset[row + 1] - self.offset[row]
    }

    /// returns an iterator over row counts, very useful in this library
    pub fn rowcounts<'a>(&'a self) -> impl Iterator<Item = usize> + 'a {
        self.offset[0..self.numrows]
            .iter()
            .zip(&self.offset[1..self.numrows + 1])
            .map(|(a, b)| b - a)
    }

    /// dumps the head and tail of the CSR arrays to a file
    /// # Arguments
    /// * maxrows the number of entries of each array that are written, 0 means everything,
    ///           otherwise write the first and last maxrows/2 entries (at least one each)
    /// * filename the filename to written to
    pub fn dump(&self, maxrows: usize, filename: &str) -> Result<()> {
        let path = Path::new(&filename);
        let mut file = BufWriter::new(File::create(path)?);
        self.dump_to(maxrows, &mut file)
    }

    /// dump to any writer
    pub fn dump_to<W>(&self, maxrows: usize, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        fn head_tail<W: Write>(
            writer: &mut W,
            len: usize,
            maxrows: usize,
            line: &dyn Fn(&mut W, usize) -> std::io::Result<()>,
        ) -> std::io::Result<()> {
            if maxrows == 0 || maxrows >= len {
                for i in 0..len {
                    line(writer, i)?;
                }
            } else {
                let half = std::cmp::max(1, maxrows / 2);
                for i in 0..half {
                    line(writer, i)?;
                }
                writeln!(writer, "...")?;
                for i in len - half..len {
                    line(writer, i)?;
                }
            }
            Ok(())
        }

        writeln!(
            writer,
            "--------- {} rows, {} columns, {} nonzeros",
            self.numrows, self.numcols, self.nnz
        )?;
        writeln!(writer, "--------- offsets:")?;
        head_tail(writer, self.numrows + 1, maxrows, &|w, i| {
            writeln!(w, "offset[{}] == {}", i, self.offset[i])
        })?;
        writeln!(
            writer,
            "{}",
            match &self.value {
                None => "--------- nonzeros:",
                Some(_) => "--------- nonzeros and values:",
            },
        )?;
        head_tail(writer, self.nnz, maxrows, &|w, i| match &self.value {
            Some(value) => writeln!(w, "nonzero[{}] == {} value[{}] == {}", i, self.nonzero[i], i, value[i]),
            None => writeln!(w, "nonzero[{}] == {}", i, self.nonzero[i]),
        })?;
        Ok(())
    }

    /// prints some stats of a sparse matrix
    pub fn stats(&self) {
        println!("    numrows  = {}", self.numrows);
        println!("    numcols  = {}", self.numcols);
        println!("    nnz      = {}", self.nnz);
        if self.value.is_some() {
            println!("    matrix with values");
        } else {
            println!("    matrix pattern only");
        }

        // compute min, max, sum all at once for efficiency, only once thru itereator
        let (mindeg, maxdeg, sumdeg) = self.rowcounts().fold((self.numcols, 0, 0), |acc, x| {
            (acc.0.min(x), acc.1.max(x), acc.2 + x)
        });

        let avgdeg = if self.numrows > 0 {
            sumdeg as f64 / self.numrows as f64
        } else {
            0.0
        };

        println!(
            "    min, avg, max degree = {}, {}, {}",
            mindeg, avgdeg, maxdeg
        );
    }

    /// writes a sparse matrix to a file in the .csr ASCII format
    /// # Arguments
    /// * filename the filename to written to
    pub fn write_csr_file(&self, filename: &str) -> Result<()> {
        let path = Path::new(&filename);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_csr(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// write .csr to any writer, pattern matrices get unit values
    pub fn write_csr<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writeln!(writer, "{} {} {}", self.numrows, self.numcols, self.nnz)?;
        writeln!(writer, "VERTICES")?;
        for off in &self.offset {
            writeln!(writer, "{}", off)?;
        }
        writeln!(writer, "EDGES")?;
        for nz in &self.nonzero {
            writeln!(writer, "{}", nz)?;
        }
        writeln!(writer, "VALUES")?;
        match &self.value {
            Some(value) => {
                for v in value {
                    writeln!(writer, "{}", v)?;
                }
            }
            None => {
                for _ in 0..self.nnz {
                    writeln!(writer, "1")?;
                }
            }
        }
        debug!(
            "wrote csr {}x{} with {} nonzeros",
            self.numrows, self.numcols, self.nnz
        );
        Ok(())
    }

    /// read a sparse matrix from a file in the .csr ASCII format
    /// # Arguments
    /// * filename the file to be read
    pub fn read_csr_file(filename: &str) -> Result<SparseMat> {
        let path = Path::new(&filename);
        let fp = File::open(path)?;
        let mut reader = BufReader::new(fp);
        SparseMat::read_csr(&mut reader)
    }

    /// read .csr from any BufRead
    ///
    /// A metadata line `rows columns edges` is followed by the sections
    /// VERTICES (rows+1 offsets), EDGES (edges columns) and VALUES (edges floats),
    /// one number per line.  Blank lines are ignored.
    pub fn read_csr<R>(reader: &mut R) -> Result<SparseMat>
    where
        R: BufRead,
    {
        #[derive(Debug, Clone, Copy, PartialEq)]
        enum Section {
            Header,
            Vertices,
            Edges,
            Values,
        }

        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        let (lineno, line) = match lines.next() {
            Some((n, l)) => (n, l?),
            None => return Err(csr_err(1, "empty input, no metadata line".to_string())),
        };
        let re = Regex::new(r"^\s*(\d+)\s+(\d+)\s+(\d+)\s*$")?;
        let caps = re
            .captures(&line)
            .ok_or_else(|| csr_err(lineno, format!("bad metadata line '{}'", line)))?;
        let nr: usize = csr_token(&caps[1], lineno, "a row count")?;
        let nc: usize = csr_token(&caps[2], lineno, "a column count")?;
        let nnz: usize = csr_token(&caps[3], lineno, "an edge count")?;

        let nv = nr
            .checked_add(1)
            .ok_or_else(|| csr_err(lineno, format!("row count {} is too large", nr)))?;

        // the header is not trusted for allocation, the sections grow as they are read
        let mut offset: Vec<usize> = Vec::with_capacity(nv.min(MAX_PRESIZE));
        let mut nonzero: Vec<usize> = Vec::with_capacity(nnz.min(MAX_PRESIZE));
        let mut value: Vec<f64> = Vec::with_capacity(nnz.min(MAX_PRESIZE));
        let mut section = Section::Header;
        let mut last = lineno;

        for (n, line) in lines {
            let line = line?;
            last = n;
            let tok = line.trim();
            if tok.is_empty() {
                continue;
            }
            match (section, tok) {
                (Section::Header, "VERTICES") => section = Section::Vertices,
                (Section::Header, _) => {
                    return Err(csr_err(n, format!("expected VERTICES, found '{}'", tok)))
                }
                (Section::Vertices, "EDGES") => {
                    if offset.len() != nv {
                        return Err(csr_err(
                            n,
                            format!("{} vertices, expected {}", offset.len(), nv),
                        ));
                    }
                    section = Section::Edges;
                }
                (Section::Vertices, _) => {
                    if offset.len() == nv {
                        return Err(csr_err(n, format!("more than {} vertices", nv)));
                    }
                    offset.push(csr_token(tok, n, "a vertex offset")?);
                }
                (Section::Edges, "VALUES") => {
                    if nonzero.len() != nnz {
                        return Err(csr_err(
                            n,
                            format!("{} edges, expected {}", nonzero.len(), nnz),
                        ));
                    }
                    section = Section::Values;
                }
                (Section::Edges, _) => {
                    if nonzero.len() == nnz {
                        return Err(csr_err(n, format!("more than {} edges", nnz)));
                    }
                    nonzero.push(csr_token(tok, n, "an edge column")?);
                }
                (Section::Values, _) => {
                    if value.len() == nnz {
                        return Err(csr_err(n, format!("more than {} values", nnz)));
                    }
                    value.push(csr_token(tok, n, "a value")?);
                }
            }
        }

        if section != Section::Values {
            return Err(csr_err(
                last,
                format!("input ended inside the {:?} section", section),
            ));
        }
        if value.len() != nnz {
            return Err(csr_err(
                last,
                format!("{} values, expected {}", value.len(), nnz),
            ));
        }

        debug!("read csr {}x{} with {} nonzeros", nr, nc, nnz);
        SparseMat::from_parts(nr, nc, offset, nonzero, Some(value))
    }

    /// writes a sparse matrix to a file in a MatrixMarket ASCII formats
    /// # Arguments
    /// * filename the filename to written to
    pub fn write_mm_file(&self, filename: &str) -> Result<()> {
        let path = Path::new(&filename);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_mm(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// write mm to any writer
    pub fn write_mm<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        if let Some(value) = &self.value {
            writeln!(writer, "%%MatrixMarket matrix coordinate real general")?;
            writeln!(writer, "{} {} {}", self.numrows, self.numcols, self.nnz)?;
            for i in 0..self.numrows {
                for k in self.offset[i]..self.offset[i + 1] {
                    writeln!(writer, "{} {} {}", i + 1, self.nonzero[k] + 1, value[k])?;
                }
            }
        } else {
            writeln!(writer, "%%MatrixMarket matrix coordinate pattern general")?;
            writeln!(writer, "{} {} {}", self.numrows, self.numcols, self.nnz)?;
            for i in 0..self.numrows {
                for nz in self.row(i) {
                    writeln!(writer, "{} {}", i + 1, nz + 1)?;
                }
            }
        }
        Ok(())
    }

    /// read a sparse matrix from a file in a MatrixMarket ASCII format
    /// # Arguments
    /// * filename the file to be read
    pub fn read_mm_file(filename: &str) -> Result<SparseMat> {
        let path = Path::new(&filename);
        let fp = File::open(path)?;
        let mut reader = BufReader::new(fp);
        SparseMat::read_mm(&mut reader)
    }

    /// read from any BufRead
    ///
    /// The entries form an unsorted adjacency list, they are sorted by row
    /// and column and then swept once to build the offsets.
    pub fn read_mm<R>(reader: &mut R) -> Result<SparseMat>
    where
        R: BufRead,
    {
        let mut lines = reader.lines();
        let line = lines.next().unwrap_or_else(|| Ok("".to_string()))?;
        let re1 = Regex::new(r"^%%MatrixMarket *matrix *coordinate *pattern*")?;
        let re2 = Regex::new(r"^%%MatrixMarket *matrix *coordinate *real*")?;
        if !re1.is_match(&line) && !re2.is_match(&line) {
            return Err(Sparsemat(ParseMmError::new(format!(
                "invalid header {}",
                line
            ))));
        }
        let has_values = re2.is_match(&line);

        // skip the comment preamble
        let mut line = String::new();
        for next in &mut lines {
            let next = next?;
            if !next.starts_with('%') {
                line = next;
                break;
            }
        }
        let inputs: Vec<&str> = line.split_whitespace().collect();
        if inputs.len() < 3 {
            return Err(Sparsemat(ParseMmError::new(format!(
                "bad size line '{}'",
                line
            ))));
        }
        let nr: usize = inputs[0].parse()?;
        let nc: usize = inputs[1].parse()?;
        let nnz: usize = inputs[2].parse()?;
        if nr == 0 || nc == 0 {
            return Err(Sparsemat(ParseMmError::new(format!(
                "bad matrix sizes {} {} {}",
                nr, nc, nnz
            ))));
        }
        let nv = nr.checked_add(1).ok_or_else(|| {
            Sparsemat(ParseMmError::new(format!("row count {} is too large", nr)))
        })?;

        #[derive(Debug)]
        struct Elt {
            row: usize,
            col: usize,
            val: f64,
        }

        let mut elts: Vec<Elt> = Vec::with_capacity(nnz.min(MAX_PRESIZE));
        for line in lines {
            let line = line?;
            let inputs: Vec<&str> = line.split_whitespace().collect();
            if inputs.is_empty() {
                continue;
            }
            if inputs.len() < 2 || (has_values && inputs.len() < 3) {
                return Err(Sparsemat(ParseMmError::new(format!(
                    "short nonzero line '{}'",
                    line
                ))));
            }
            let row: usize = inputs[0].parse()?;
            let col: usize = inputs[1].parse()?;
            let val: f64 = if has_values { inputs[2].parse()? } else { 1.0 };
            if row == 0 || row > nr || col == 0 || col > nc {
                return Err(Sparsemat(ParseMmError::new(format!(
                    "bad matrix nonzero coordinates {} {}",
                    row, col
                ))));
            }
            elts.push(Elt {
                row: row - 1,
                col: col - 1,
                val,
            }); // MatrixMarket format is 1-up, not 0-up
        }
        if elts.len() != nnz {
            return Err(Sparsemat(ParseMmError::new(format!(
                "incorrect number of nonzeros {} != {}",
                elts.len(),
                nnz
            ))));
        }

        elts.sort_by(|a, b| a.row.cmp(&b.row).then(a.col.cmp(&b.col)));

        // nnz now matches the entries actually read, only the row count is unchecked
        let mut offset: Vec<usize> = Vec::new();
        offset.try_reserve_exact(nv).map_err(|_| {
            Sparsemat(ParseMmError::new(format!("no room for {} row offsets", nv)))
        })?;
        offset.resize(nv, 0);
        let mut nonzero: Vec<usize> = vec![0; nnz];
        let mut values: Vec<f64> = Vec::with_capacity(if has_values { nnz } else { 0 });
        let mut row: usize = 0;
        for (i, elt) in elts.iter().enumerate() {
            if i > 0 && elts[i - 1].row == elt.row && elts[i - 1].col == elt.col {
                return Err(Sparsemat(ParseMmError::new(format!(
                    "duplicate nonzero {} {}",
                    elt.row + 1,
                    elt.col + 1
                ))));
            }
            // first adjust so we are on correct row
            while row < elt.row {
                row += 1;
                offset[row] = i;
            }
            nonzero[i] = elt.col;
            if has_values {
                values.push(elt.val);
            }
        }
        for off in offset.iter_mut().skip(row + 1) {
            *off = nnz;
        }
        debug!("read mm {}x{} with {} nonzeros", nr, nc, nnz);
        SparseMat::from_parts(
            nr,
            nc,
            offset,
            nonzero,
            if has_values { Some(values) } else { None },
        )
    }

    /// apply a row permutation to a sparse matrix
    /// # Arguments
    /// * rperm the permutation, row i of the result is row rperm[i] of self
    pub fn permute_rows(&self, rperm: &Perm) -> Result<SparseMat> {
        if rperm.len() != self.numrows || !rperm.is_perm() {
            return Err(SparseMatError::InvalidArgument(format!(
                "not a permutation of {} rows",
                self.numrows
            )));
        }
        let mut ap = SparseMat::new(self.numrows, self.numcols, 0);
        let mut value: Option<Vec<f64>> = self.value.as_ref().map(|_| Vec::with_capacity(self.nnz));

        for i in 0..ap.numrows {
            let row = rperm.entry(i);
            ap.nonzero.extend_from_slice(self.row(row));
            if let (Some(dst), Some(src)) = (value.as_mut(), self.value.as_ref()) {
                dst.extend_from_slice(&src[self.offset[row]..self.offset[row + 1]]);
            }
            ap.offset[i + 1] = ap.nonzero.len();
        }
        ap.nnz = ap.nonzero.len();
        ap.value = value;
        Ok(ap)
    }

    /// compare the structs that hold two sparse matrices
    /// # Arguments
    /// * rmat pointer to the right sparse matrix
    pub fn compare(&self, rmat: &SparseMat) -> bool {
        if self.value.is_none() != rmat.value.is_none() {
            println!(
                "(self.value is {})  != (rmat.value is {})",
                if self.value.is_some() { "Some(_)" } else { "None" },
                if rmat.value.is_some() { "Some(_)" } else { "None" },
            );
            return false;
        }
        if self.numrows != rmat.numrows {
            println!(
                "(self.numrows = {})  != (rmat.numrows = {})",
                self.numrows, rmat.numrows
            );
            return false;
        }
        if self.numcols != rmat.numcols {
            println!(
                "(self.numcols = {})  != (rmat.numcols = {})",
                self.numcols, rmat.numcols
            );
            return false;
        }
        if self.nnz != rmat.nnz {
            println!("(self.nnz = {})  != (rmat.nnz = {})", self.nnz, rmat.nnz);
            return false;
        }
        for row in 0..self.numrows + 1 {
            if self.offset[row] != rmat.offset[row] {
                println!(
                    "(self.offset[{}] = {})  != (rmat.offset[{}] = {})",
                    row, self.offset[row], row, rmat.offset[row]
                );
                return false;
            }
        }
        for i in 0..self.nnz {
            if self.nonzero[i] != rmat.nonzero[i] {
                println!(
                    "(self.nonzero[{}] = {})  != (rmat.nonzero[{}] = {})",
                    i, self.nonzero[i], i, rmat.nonzero[i]
                );
                return false;
            }
        }
        if let (Some(sval), Some(rval)) = (&self.value, &rmat.value) {
            for i in 0..self.nnz {
                if (sval[i] - rval[i]).abs() > 10.0 * f64::EPSILON * sval[i].abs() {
                    println!(
                        "(self.value[{}] = {})  != (rmat.value[{}] = {})",
                        i, sval[i], i, rval[i]
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Generates a random matrix by flipping a coin for each cell.
    ///
    /// # Arguments
    /// * numrows, numcols the shape of the matrix
    /// * density_pct the percent chance (0 to 100) that a cell is nonzero
    /// * seed A random seed.
    ///
    /// Nonzeros get the value 1.0.  This costs numrows*numcols draws, so it is
    /// meant for test inputs, not for big graphs.
    pub fn random_csr(numrows: usize, numcols: usize, density_pct: f64, seed: u64) -> SparseMat {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut mat = SparseMat::new(numrows, numcols, 0);

        for row in 0..numrows {
            for col in 0..numcols {
                if 100.0 * rng.gen::<f64>() < density_pct {
                    mat.nonzero.push(col);
                }
            }
            mat.offset[row + 1] = mat.nonzero.len();
        }
        mat.nnz = mat.nonzero.len();
        mat.value = Some(vec![1.0; mat.nnz]);
        debug!(
            "random csr {}x{} density {}% gave {} nonzeros",
            numrows, numcols, density_pct, mat.nnz
        );
        mat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMALL_CSR: &str = "4 4 7\nVERTICES\n0\n2\n4\n5\n7\nEDGES\n1\n2\n2\n3\n0\n1\n3\nVALUES\n1\n1\n1\n1\n1\n1\n1\n";

    fn small() -> SparseMat {
        SparseMat::read_csr(&mut Cursor::new(SMALL_CSR)).expect("failed read")
    }

    #[test]
    fn is_perm1() {
        let perm = Perm::new(4);
        assert_eq!(true, perm.is_perm());
    }

    #[test]
    fn is_perm2() {
        let mut perm = Perm::new(4);
        perm.perm[1] = 3;
        assert_eq!(false, perm.is_perm());
    }

    #[test]
    fn is_perm3() {
        let mut perm = Perm::new(4);
        perm.perm[1] = 4;
        assert_eq!(false, perm.is_perm());
    }

    #[test]
    fn rand_perm1() {
        let perm = Perm::random(100, 0);
        assert_eq!(true, perm.is_perm());
        assert_eq!(perm, Perm::random(100, 0));
    }

    #[test]
    fn inverse1() {
        let perm = Perm::from_vec(vec![2, 0, 3, 1]);
        let inv = perm.inverse();
        assert_eq!(inv.as_slice(), &[1, 3, 0, 2]);
        for i in 0..perm.len() {
            assert_eq!(inv.entry(perm.entry(i)), i);
        }
    }

    #[test]
    fn perm_dump1() {
        let f1 = format!("{}/perm_dump1.out", std::env::temp_dir().to_str().unwrap());
        let perm = Perm::from_vec(vec![4, 3, 2, 1, 0]);
        perm.write_perm_file(&f1).expect("failed write");
        let text = std::fs::read_to_string(&f1).expect("failed read");
        assert_eq!(text, "4\n3\n2\n1\n0\n");
        perm.dump(2, &f1).expect("failed dump");
        let text = std::fs::read_to_string(&f1).expect("failed read");
        assert_eq!(text, "4\n...\n0\n");
        perm.dump(1, &f1).expect("failed dump");
        let text = std::fs::read_to_string(&f1).expect("failed read");
        assert_eq!(text, "4\n...\n0\n");
    }

    #[test]
    fn read_csr1() {
        let mat = small();
        assert_eq!(mat.numrows(), 4);
        assert_eq!(mat.numcols(), 4);
        assert_eq!(mat.nnz(), 7);
        assert_eq!(mat.row(0), &[1, 2]);
        assert_eq!(mat.row(2), &[0]);
        assert_eq!(mat.degree(3), 2);
        assert_eq!(mat.rowcounts().collect::<Vec<_>>(), vec![2, 2, 1, 2]);
    }

    #[test]
    fn read_csr2() {
        let mat = SparseMat::read_csr_file("good/4x4.csr");
        match mat {
            Ok(m) => assert!(m.compare(&small())),
            Err(e) => panic!("{}", e),
        }
    }

    #[test]
    fn read_csr_missing_file() {
        assert!(SparseMat::read_csr_file("not_there.csr").is_err());
    }

    #[test]
    fn read_csr_bad_marker() {
        let text = "2 2 1\nVERTICE\n0\n1\n1\nEDGES\n0\nVALUES\n1.0\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::Csr(e)) => assert_eq!(e.line(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_csr_too_many_vertices() {
        let text = "2 2 1\nVERTICES\n0\n1\n1\n1\nEDGES\n0\nVALUES\n1.0\n";
        assert!(SparseMat::read_csr(&mut Cursor::new(text)).is_err());
    }

    #[test]
    fn read_csr_short_edges() {
        let text = "2 2 2\nVERTICES\n0\n1\n2\nEDGES\n0\nVALUES\n1.0\n2.0\n";
        assert!(SparseMat::read_csr(&mut Cursor::new(text)).is_err());
    }

    #[test]
    fn read_csr_premature_end() {
        let text = "2 2 1\nVERTICES\n0\n1\n1\nEDGES\n0\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::Csr(e)) => assert_eq!(e.line(), 7),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_csr_bad_token() {
        let text = "2 2 1\nVERTICES\n0\nx\n1\nEDGES\n0\nVALUES\n1.0\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::Csr(e)) => assert_eq!(e.line(), 4),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_csr_last_vertex_not_edges() {
        // well formed sections, but offset[rows] != edges
        let text = "2 2 1\nVERTICES\n0\n1\n2\nEDGES\n0\nVALUES\n1.0\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn write_csr1() {
        let f1 = format!("{}/4x4_1.csr", std::env::temp_dir().to_str().unwrap());
        let mat = small();
        mat.write_csr_file(&f1).expect("failed write");
        let mat1 = SparseMat::read_csr_file(&f1).expect("failed read");
        assert_eq!(mat.compare(&mat1), true);
    }

    #[test]
    fn write_csr_pattern() {
        let mut out: Vec<u8> = Vec::new();
        let mat = SparseMat::from_parts(2, 3, vec![0, 1, 3], vec![2, 0, 1], None).unwrap();
        mat.write_csr(&mut out).expect("failed write");
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "2 3 3\nVERTICES\n0\n1\n3\nEDGES\n2\n0\n1\nVALUES\n1\n1\n1\n"
        );
    }

    #[test]
    fn from_parts_rejects() {
        // wrong offset length
        assert!(SparseMat::from_parts(2, 2, vec![0, 1], vec![0], None).is_err());
        // offset[0] != 0
        assert!(SparseMat::from_parts(1, 2, vec![1, 1], vec![0], None).is_err());
        // decreasing offsets
        assert!(SparseMat::from_parts(2, 2, vec![0, 2, 1], vec![0], None).is_err());
        // column out of range
        assert!(SparseMat::from_parts(1, 2, vec![0, 1], vec![2], None).is_err());
        // unsorted row
        assert!(SparseMat::from_parts(1, 3, vec![0, 2], vec![2, 1], None).is_err());
        // duplicate column
        assert!(SparseMat::from_parts(1, 3, vec![0, 2], vec![1, 1], None).is_err());
        // value length
        assert!(SparseMat::from_parts(1, 3, vec![0, 1], vec![1], Some(vec![])).is_err());
        // empty rows are fine
        assert!(SparseMat::from_parts(3, 3, vec![0, 0, 1, 1], vec![2], None).is_ok());
    }

    #[test]
    fn read_csr_huge_header() {
        let text = "18446744073709551615 1 0\nVERTICES\n0\nEDGES\nVALUES\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::Csr(e)) => assert_eq!(e.line(), 1),
            other => panic!("unexpected {:?}", other),
        }
        let text = "1 1 4611686018427387904\nVERTICES\n0\n0\nEDGES\nVALUES\n";
        match SparseMat::read_csr(&mut Cursor::new(text)) {
            Err(SparseMatError::Csr(e)) => assert_eq!(e.line(), 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn from_parts_huge_numrows() {
        let mat = SparseMat::from_parts(usize::MAX, 1, vec![0], vec![], None);
        assert!(mat.is_err());
    }

    #[test]
    fn read_mm1() {
        assert!(SparseMat::read_mm_file("not_there.mm").is_err());
    }

    #[test]
    fn read_mm2() {
        let mat = SparseMat::read_mm_file("good/10_ring.mm");
        match mat {
            Ok(m) => {
                assert_eq!(m.numrows(), 10);
                assert_eq!(m.nnz(), 20);
                assert_eq!(m.row(0), &[1, 9]);
                assert_eq!(m.row(5), &[4, 6]);
            }
            Err(e) => panic!("{}", e),
        }
    }

    #[test]
    fn read_mm_unsorted_with_comments() {
        let text = "%%MatrixMarket matrix coordinate real general\n% a comment\n%another\n3 3 3\n3 1 0.5\n1 3 2.0\n1 2 1.5\n";
        let mat = SparseMat::read_mm(&mut Cursor::new(text)).expect("failed read");
        assert_eq!(mat.offset, vec![0, 2, 2, 3]);
        assert_eq!(mat.nonzero, vec![1, 2, 0]);
        assert_eq!(mat.value, Some(vec![1.5, 2.0, 0.5]));
    }

    #[test]
    fn read_mm_huge_header() {
        let text = "%%MatrixMarket matrix coordinate pattern general\n18446744073709551615 1 0\n";
        assert!(SparseMat::read_mm(&mut Cursor::new(text)).is_err());
        let text = "%%MatrixMarket matrix coordinate pattern general\n2 2 4611686018427387904\n1 1\n";
        assert!(SparseMat::read_mm(&mut Cursor::new(text)).is_err());
    }

    #[test]
    fn read_mm_duplicate() {
        let text = "%%MatrixMarket matrix coordinate pattern general\n2 2 2\n1 2\n1 2\n";
        assert!(SparseMat::read_mm(&mut Cursor::new(text)).is_err());
    }

    #[test]
    fn write_mm1() {
        let f1 = format!("{}/10_ring1.mm", std::env::temp_dir().to_str().unwrap());
        let mat = SparseMat::read_mm_file("good/10_ring.mm").expect("failed read");
        mat.write_mm_file(&f1).expect("failed write");
        let mat1 = SparseMat::read_mm_file(&f1).expect("failed read");
        assert_eq!(mat.compare(&mat1), true);
    }

    #[test]
    fn dump1() {
        let mut out: Vec<u8> = Vec::new();
        let mat = SparseMat::read_mm_file("good/10_ring.mm").expect("failed read");
        mat.dump_to(4, &mut out).expect("failed dump");
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("--------- 10 rows, 10 columns, 20 nonzeros\n"));
        assert!(text.contains("offset[0] == 0\n"));
        assert!(text.contains("offset[10] == 20\n"));
        assert!(!text.contains("offset[5] =="));
    }

    #[test]
    fn dump_one_each_end() {
        let mut out: Vec<u8> = Vec::new();
        let mat = SparseMat::read_mm_file("good/10_ring.mm").expect("failed read");
        mat.dump_to(1, &mut out).expect("failed dump");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("offset[0] == 0\n...\noffset[10] == 20\n"));
        assert!(text.contains("nonzero[0] =="));
        assert!(text.contains("nonzero[19] =="));
    }

    #[test]
    fn compare1() {
        let mat = SparseMat::read_mm_file("good/10_ring.mm").expect("failed read");
        assert_eq!(mat.compare(&mat), true);
        assert_eq!(mat.compare(&small()), false);
    }

    #[test]
    fn permute_rows1() {
        let mat = small();
        let rperm = Perm::from_vec(vec![2, 0, 3, 1]);
        let pmat = mat.permute_rows(&rperm).expect("failed permute");
        assert_eq!(pmat.row(0), &[0]);
        assert_eq!(pmat.row(1), &[1, 2]);
        assert_eq!(pmat.row(3), &[2, 3]);
        assert_eq!(pmat.compare(&mat), false);
        let ppmat = pmat.permute_rows(&rperm.inverse()).expect("failed permute");
        assert_eq!(ppmat.compare(&mat), true);
    }

    #[test]
    fn permute_rows_rejects() {
        let mat = small();
        assert!(mat.permute_rows(&Perm::new(3)).is_err());
        assert!(mat.permute_rows(&Perm::from_vec(vec![0, 0, 1, 2])).is_err());
    }

    #[test]
    fn rand_mat1() {
        let mat = SparseMat::random_csr(50, 40, 10.0, 7);
        assert!(mat.validate().is_ok());
        assert!(mat.nnz() > 0 && mat.nnz() < 50 * 40);
        assert!(mat.compare(&SparseMat::random_csr(50, 40, 10.0, 7)));
        assert_eq!(SparseMat::random_csr(5, 5, 0.0, 1).nnz(), 0);
        assert_eq!(SparseMat::random_csr(5, 5, 100.0, 1).nnz(), 25);
    }
}
