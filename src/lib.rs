//! # csvcol
//!
//! Select rows and columns from CSV data by range specifications.
//!
//! ## Overview
//!
//! A specification is a comma-separated list of 1-indexed ranges:
//! - **`n`**: a single position
//! - **`m-n`**: positions `m` through `n`
//! - **`-n`**: positions `1` through `n`
//! - **`n-`**: position `n` through the last one
//! - **`-`**: every position
//!
//! Rows and columns each get their own [`RangeFilter`]. Fragments from the
//! command line and from specification files accumulate into the same
//! filter; a position is selected when any fragment covers it. An axis with
//! no specification selects everything.
//!
//! ## Example
//!
//! ```
//! use csvcol::{Classification, RangeFilter};
//!
//! let mut rows = RangeFilter::new();
//! rows.update("-3,5-7,9,11-").unwrap();
//!
//! let selected: Vec<usize> = (1..=12).filter(|&p| rows.query(p).is_match()).collect();
//! assert_eq!(selected, vec![1, 2, 3, 5, 6, 7, 9, 11, 12]);
//! assert_eq!(rows.query(11), Classification::MatchAndAbove);
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod range;
pub mod select;
pub mod source;

pub use config::{AxisSpec, Config, parse_comment};
pub use error::{Error, ErrorKind, Result};
pub use filter::{Axis, Classification, Cursor, RangeFilter};
pub use range::{InvalidRangeError, Range, RangeFault, parse};
pub use select::{Filters, Selection, Selector, run, writer};
pub use source::{Input, apply_spec_file, apply_spec_lines};
