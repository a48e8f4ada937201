//! Slice expressions describe a rectangular sub-selection of a palette:
//! `nrows` contiguous rows of `length` entries each, starting at `start`.
//!
//! Grammar: `[START]:[NROWS][,[LENGTH]]`. Omitted parts are derived from
//! the entries available past `start`; an empty expression (or `":"`,
//! `":,"`) selects the whole palette as one row.

use crate::error::SortError;

/// How a derived slice dimension relates to the available range.
///
/// `RoundedDown` marks a dimension that was inferred by division and did
/// not divide evenly; the count was floored. Callers decide whether to
/// tolerate the uncovered remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Exact,
    RoundedDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: usize,
    pub nrows: usize,
    pub length: usize,
    pub nrows_fit: Fit,
    pub length_fit: Fit,
}

impl SliceSpec {
    /// Whole palette as a single row.
    pub fn whole(numcolors: usize) -> Self {
        Self {
            start: 0,
            nrows: 1,
            length: numcolors,
            nrows_fit: Fit::Exact,
            length_fit: Fit::Exact,
        }
    }

    /// Total entries the slice covers, counted from position 0.
    pub fn end(&self) -> usize {
        self.start + self.nrows * self.length
    }
}

/// Parse a slice expression against a palette of `numcolors` entries.
///
/// A bare integer with no colon is always rejected: it could mean either
/// a start or a row count.
pub fn parse_slice(expr: &str, numcolors: usize) -> Result<SliceSpec, SortError> {
    let text = expr.trim();
    if matches!(text, "" | ":" | ":,") {
        return Ok(SliceSpec::whole(numcolors));
    }

    let fail = || SortError::InvalidSliceExpression {
        expr: expr.to_string(),
    };

    let (start_text, rest) = text.split_once(':').ok_or_else(fail)?;
    if rest.contains(':') {
        return Err(fail());
    }

    let start = if start_text.is_empty() {
        0
    } else {
        start_text.parse::<usize>().map_err(|_| fail())?
    };
    if start > numcolors {
        return Err(fail());
    }
    let available = numcolors - start;

    let (nrows, length, nrows_fit, length_fit) = match rest.split_once(',') {
        // `START:NROWS` — row length is derived.
        None => {
            let nrows = parse_count(rest).ok_or_else(fail)?;
            let (length, length_fit) = derive(available, nrows).ok_or_else(fail)?;
            (nrows, length, Fit::Exact, length_fit)
        }
        Some((nrows_text, length_text)) => {
            if length_text.contains(',') {
                return Err(fail());
            }
            match (nrows_text.is_empty(), length_text.is_empty()) {
                (true, true) => return Err(fail()),
                (false, true) => {
                    let nrows = parse_count(nrows_text).ok_or_else(fail)?;
                    let (length, length_fit) = derive(available, nrows).ok_or_else(fail)?;
                    (nrows, length, Fit::Exact, length_fit)
                }
                (true, false) => {
                    let length = parse_count(length_text).ok_or_else(fail)?;
                    let (nrows, nrows_fit) = derive(available, length).ok_or_else(fail)?;
                    (nrows, length, nrows_fit, Fit::Exact)
                }
                (false, false) => {
                    let nrows = parse_count(nrows_text).ok_or_else(fail)?;
                    let length = parse_count(length_text).ok_or_else(fail)?;
                    (nrows, length, Fit::Exact, Fit::Exact)
                }
            }
        }
    };

    Ok(SliceSpec {
        start,
        nrows,
        length,
        nrows_fit,
        length_fit,
    })
}

/// A user-supplied dimension: a positive integer. Zero is rejected.
fn parse_count(text: &str) -> Option<usize> {
    match text.parse::<usize>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Derive the missing dimension from the available range. Returns `None`
/// when the result would be zero (nothing left to cover).
fn derive(available: usize, given: usize) -> Option<(usize, Fit)> {
    let derived = available / given;
    if derived == 0 {
        return None;
    }
    let fit = if derived * given == available {
        Fit::Exact
    } else {
        Fit::RoundedDown
    };
    Some((derived, fit))
}
