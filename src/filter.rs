//! Range filter: point membership over an accumulated set of ranges.
//!
//! A [`RangeFilter`] holds every range applied to one axis. Queries return a
//! [`Classification`] that tells the caller both whether a position is
//! selected and whether every later position is selected too. Once the
//! answer is [`Classification::MatchAndAbove`], a caller walking positions
//! in increasing order may stop asking; [`Cursor`] does exactly that.

use std::fmt;

use tracing::debug;

use crate::range::{self, InvalidRangeError, Range};

/// The dimension a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Result of a point query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not covered by any range.
    NoMatch,
    /// Covered, but a later position may not be.
    Match,
    /// Covered, and so is every later position.
    MatchAndAbove,
}

impl Classification {
    pub fn is_match(self) -> bool {
        !matches!(self, Classification::NoMatch)
    }
}

/// Accumulated ranges for one axis.
///
/// An empty filter selects everything. Ranges are never merged; a position
/// is selected when any range covers it.
#[derive(Debug, Clone, Default)]
pub struct RangeFilter {
    /// Every range applied, in arrival order.
    ranges: Vec<Range>,
    /// Sealed bounded ranges as `(start, reach)`, sorted by start. `reach`
    /// is the largest end of any bounded range starting at or before
    /// `start`, so `start..=reach` covers nothing the originals don't.
    sealed: Vec<(usize, usize)>,
    /// Bounded ranges added since the last [`RangeFilter::seal`].
    pending: Vec<(usize, usize)>,
    /// Lowest start of any range open above.
    open_from: Option<usize>,
    match_all: bool,
}

impl RangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter that selects every position regardless of later updates.
    pub fn match_all() -> Self {
        Self {
            match_all: true,
            ..Self::default()
        }
    }

    /// Parse `text` and add its ranges. On error the filter is unchanged.
    pub fn update(&mut self, text: &str) -> Result<(), InvalidRangeError> {
        let ranges = range::parse(text)?;
        debug!("adding {} range(s) from {text:?}", ranges.len());
        self.extend(ranges);
        Ok(())
    }

    /// Add already-parsed ranges.
    ///
    /// New bounded ranges stay unsorted until [`RangeFilter::seal`]; queries
    /// before then scan them linearly.
    pub fn extend<I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = Range>,
    {
        for range in ranges {
            self.ranges.push(range);
            if range.is_all() {
                self.match_all = true;
            } else if let Some(end) = range.end() {
                self.pending.push((range.start(), end));
            } else {
                let start = range.start();
                self.open_from = Some(self.open_from.map_or(start, |s| s.min(start)));
            }
        }
    }

    /// Sort pending bounded ranges into the searchable set.
    ///
    /// Call once after the last update; queries are answered by binary
    /// search from then on.
    pub fn seal(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.sealed.append(&mut self.pending);
        self.sealed.sort_unstable();

        let mut reach = 0;
        for (_, end) in &mut self.sealed {
            reach = reach.max(*end);
            *end = reach;
        }
    }

    /// Classify a 1-indexed position.
    pub fn query(&self, position: usize) -> Classification {
        if self.match_all || self.ranges.is_empty() {
            return Classification::MatchAndAbove;
        }
        if self.open_from.is_some_and(|start| position >= start) {
            return Classification::MatchAndAbove;
        }

        // The last sealed entry starting at or before `position` carries
        // the furthest end of every range before it.
        let idx = self.sealed.partition_point(|&(start, _)| start <= position);
        let in_sealed = idx > 0 && self.sealed[idx - 1].1 >= position;
        let in_pending = || {
            self.pending
                .iter()
                .any(|&(start, end)| start <= position && position <= end)
        };
        if in_sealed || in_pending() {
            Classification::Match
        } else {
            Classification::NoMatch
        }
    }

    /// Start a monotonic pass over this filter.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            filter: self,
            latched: false,
        }
    }

    /// True when no range has been applied.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_match_all(&self) -> bool {
        self.match_all
    }

    /// Number of ranges applied, duplicates included.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.match_all || self.ranges.is_empty() {
            return write!(f, "-");
        }
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

/// One increasing pass over a filter.
///
/// After the first [`Classification::MatchAndAbove`] the cursor stops
/// consulting the filter and selects everything that follows.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    filter: &'a RangeFilter,
    latched: bool,
}

impl Cursor<'_> {
    /// Whether `position` is selected. Positions must not decrease between
    /// calls.
    pub fn allows(&mut self, position: usize) -> bool {
        if self.latched {
            return true;
        }
        match self.filter.query(position) {
            Classification::NoMatch => false,
            Classification::Match => true,
            Classification::MatchAndAbove => {
                self.latched = true;
                true
            }
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
