//! Range specification parser.
//!
//! A specification fragment is a comma-separated list of tokens, each in one
//! of five forms:
//!
//! ```text
//! n      single position
//! m-n    positions m through n, inclusive
//! -n     positions 1 through n
//! n-     position n through the last one
//! -      every position
//! ```
//!
//! Positions are 1-indexed decimal integers. Whitespace around a token is
//! ignored; whitespace inside a token is not.

use std::fmt;

use thiserror::Error;

/// An inclusive interval of 1-indexed positions, possibly open at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Option<usize>,
    end: Option<usize>,
}

impl Range {
    pub(crate) const fn single(n: usize) -> Self {
        Self {
            start: Some(n),
            end: Some(n),
        }
    }

    /// The range covering every position.
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// First position covered. An unbounded start is position 1.
    pub fn start(&self) -> usize {
        self.start.unwrap_or(1)
    }

    /// Last position covered, or `None` if the range runs to the end.
    pub fn end(&self) -> Option<usize> {
        self.end
    }

    /// True for the `-` form.
    pub fn is_all(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True if every position from `start()` onward is covered.
    pub fn is_open_above(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start() && self.end.is_none_or(|end| position <= end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (None, None) => write!(f, "-"),
            (None, Some(end)) => write!(f, "-{end}"),
            (Some(start), None) => write!(f, "{start}-"),
            (Some(start), Some(end)) if start == end => write!(f, "{start}"),
            (Some(start), Some(end)) => write!(f, "{start}-{end}"),
        }
    }
}

/// Why a single token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeFault {
    #[error("empty range")]
    Empty,

    #[error("positions must be unsigned decimal integers")]
    NotANumber,

    #[error("positions start at 1")]
    Zero,

    #[error("position is too large")]
    Overflow,

    #[error("more than one '-' in a range")]
    ExtraDash,

    #[error("start {start} is after end {end}")]
    Inverted { start: usize, end: usize },
}

/// A fragment that could not be parsed. Carries the whole fragment and the
/// first offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range {token:?} in {fragment:?}: {fault}")]
pub struct InvalidRangeError {
    fragment: String,
    token: String,
    fault: RangeFault,
}

impl InvalidRangeError {
    fn new(fragment: &str, token: &str, fault: RangeFault) -> Self {
        Self {
            fragment: fragment.to_string(),
            token: token.to_string(),
            fault,
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn fault(&self) -> RangeFault {
        self.fault
    }
}

/// Parse one specification fragment into its ranges, in token order.
///
/// The fragment is rejected as a whole if any token is malformed.
pub fn parse(text: &str) -> Result<Vec<Range>, InvalidRangeError> {
    text.split(',')
        .map(str::trim)
        .map(|token| parse_token(token).map_err(|fault| InvalidRangeError::new(text, token, fault)))
        .collect()
}

fn parse_token(token: &str) -> Result<Range, RangeFault> {
    if token.is_empty() {
        return Err(RangeFault::Empty);
    }

    let Some((low, high)) = token.split_once('-') else {
        return parse_position(token).map(Range::single);
    };
    if high.contains('-') {
        return Err(RangeFault::ExtraDash);
    }

    let start = parse_bound(low)?;
    let end = parse_bound(high)?;
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(RangeFault::Inverted { start, end }),
        _ => Ok(Range { start, end }),
    }
}

fn parse_bound(text: &str) -> Result<Option<usize>, RangeFault> {
    if text.is_empty() {
        Ok(None)
    } else {
        parse_position(text).map(Some)
    }
}

fn parse_position(text: &str) -> Result<usize, RangeFault> {
    // `usize::from_str` accepts a leading '+'
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeFault::NotANumber);
    }
    match text.parse::<usize>() {
        Ok(0) => Err(RangeFault::Zero),
        Ok(n) => Ok(n),
        Err(_) => Err(RangeFault::Overflow),
    }
}
