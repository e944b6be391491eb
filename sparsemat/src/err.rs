//! Bale Serial Sparsemat error library
///
/// Copyright (c) 2020, Institute for Defense Analyses
/// 4850 Mark Center Drive, Alexandria, VA 22311-1882; 703-845-2500
///
/// All rights reserved.
///
/// This file is part of Bale.  For license information see the
/// LICENSE file in the top level dirctory of the distribution.
///
use std::error;
use std::fmt;
use std::time::SystemTimeError;

/// Everything that can go wrong building, reading or writing a sparse matrix
#[derive(Debug)]
pub enum SparseMatError {
    /// malformed MatrixMarket input
    Sparsemat(ParseMmError),
    /// malformed .csr input
    Csr(ParseCsrError),
    /// a matrix, permutation or argument that breaks the CSR invariants
    InvalidArgument(String),
    /// underlying reader/writer failure
    Io(std::io::Error),
    /// clock went backwards
    Time(std::time::SystemTimeError),
    /// integer token did not parse
    ParseInt(std::num::ParseIntError),
    /// float token did not parse
    ParseFloat(std::num::ParseFloatError),
    /// bad regular expression
    Re(regex::Error),
}

/// Detail for a bad MatrixMarket file
#[derive(Debug)]
pub struct ParseMmError {
    detail: String,
}

impl ParseMmError {
    /// wrap a message
    pub fn new(msg: String) -> ParseMmError {
        ParseMmError { detail: msg }
    }
}

impl fmt::Display for ParseMmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl error::Error for ParseMmError {}

/// Detail for a bad .csr file, `line` is 1-up and 0 when unknown
#[derive(Debug)]
pub struct ParseCsrError {
    line: usize,
    detail: String,
}

impl ParseCsrError {
    /// wrap a message found at a given line
    pub fn new(line: usize, msg: String) -> ParseCsrError {
        ParseCsrError { line, detail: msg }
    }

    /// the line the problem was noticed on
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for ParseCsrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "csr line {}: {}", self.line, self.detail)
    }
}

impl error::Error for ParseCsrError {}

impl fmt::Display for SparseMatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SparseMatError::Sparsemat(ref e) => e.fmt(f),
            SparseMatError::Csr(ref e) => e.fmt(f),
            SparseMatError::InvalidArgument(ref msg) => write!(f, "invalid argument: {}", msg),
            // This is a wrapper, so defer to the underlying types' implemenntation of `fmt`.
            SparseMatError::Io(ref e) => e.fmt(f),
            SparseMatError::Time(ref e) => e.fmt(f),
            SparseMatError::ParseInt(ref e) => e.fmt(f),
            SparseMatError::ParseFloat(ref e) => e.fmt(f),
            SparseMatError::Re(ref e) => e.fmt(f),
        }
    }
}

impl error::Error for SparseMatError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            SparseMatError::Sparsemat(ref e) => Some(e),
            SparseMatError::Csr(ref e) => Some(e),
            SparseMatError::InvalidArgument(_) => None,
            SparseMatError::Io(ref e) => Some(e),
            SparseMatError::Time(ref e) => Some(e),
            SparseMatError::ParseInt(ref e) => Some(e),
            SparseMatError::ParseFloat(ref e) => Some(e),
            SparseMatError::Re(ref e) => Some(e),
        }
    }
}

// These are called by `?` to lift the std and regex errors into SparseMatError.
impl From<SystemTimeError> for SparseMatError {
    fn from(err: SystemTimeError) -> SparseMatError {
        SparseMatError::Time(err)
    }
}

impl From<std::io::Error> for SparseMatError {
    fn from(err: std::io::Error) -> SparseMatError {
        SparseMatError::Io(err)
    }
}

impl From<std::num::ParseIntError> for SparseMatError {
    fn from(err: std::num::ParseIntError) -> SparseMatError {
        SparseMatError::ParseInt(err)
    }
}

impl From<std::num::ParseFloatError> for SparseMatError {
    fn from(err: std::num::ParseFloatError) -> SparseMatError {
        SparseMatError::ParseFloat(err)
    }
}

impl From<regex::Error> for SparseMatError {
    fn from(err: regex::Error) -> SparseMatError {
        SparseMatError::Re(err)
    }
}

impl From<ParseCsrError> for SparseMatError {
    fn from(err: ParseCsrError) -> SparseMatError {
        SparseMatError::Csr(err)
    }
}
