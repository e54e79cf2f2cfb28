//! Run configuration.
//!
//! A [`Config`] is built once from the command line and passed by reference
//! into the selection pass.

use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};
use crate::filter::{Axis, RangeFilter};
use crate::source::{self, Input};

/// Where the ranges for one axis come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSpec {
    /// Inline fragment, applied first.
    pub text: Option<String>,
    /// File of fragments, one per line, applied after `text`.
    pub file: Option<Input>,
}

impl AxisSpec {
    /// An empty inline fragment counts as absent.
    pub fn new(text: Option<String>, file: Option<Input>) -> Self {
        Self {
            text: text.filter(|t| !t.is_empty()),
            file,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.text.is_none() && self.file.is_none()
    }

    /// Build the filter for `axis`. With neither text nor file the filter
    /// selects everything.
    pub fn build_filter(&self, axis: Axis) -> Result<RangeFilter> {
        if self.is_unset() {
            return Ok(RangeFilter::match_all());
        }

        let mut filter = RangeFilter::new();
        if let Some(text) = &self.text {
            info!("processing {axis} ranges from the command line ({text})");
            filter.update(text).map_err(|source| Error::InvalidRange {
                axis,
                origin: "the command line".to_string(),
                source,
            })?;
        }
        if let Some(file) = &self.file {
            source::apply_spec_file(&mut filter, axis, file)?;
        }
        filter.seal();
        Ok(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Data file read before `files`.
    pub csvfile: Option<Input>,
    pub files: Vec<Input>,
    pub rows: AxisSpec,
    pub cols: AxisSpec,
    /// Lines of input starting with this byte are skipped.
    pub comment: Option<u8>,
    /// Output file; standard output when `None`.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csvfile: None,
            files: Vec::new(),
            rows: AxisSpec::default(),
            cols: AxisSpec::default(),
            comment: Some(b'#'),
            output: None,
        }
    }
}

impl Config {
    /// Data sources in reading order. Standard input when none are named.
    pub fn sources(&self) -> Vec<Input> {
        let sources: Vec<Input> = self.csvfile.iter().chain(&self.files).cloned().collect();
        if sources.is_empty() {
            vec![Input::Stdin]
        } else {
            sources
        }
    }

    /// Reject configurations that would read standard input twice.
    pub fn validate(&self) -> Result<()> {
        let data_on_stdin = self.sources().iter().any(Input::is_stdin);
        let readers = [
            data_on_stdin,
            self.rows.file.as_ref().is_some_and(Input::is_stdin),
            self.cols.file.as_ref().is_some_and(Input::is_stdin),
        ];
        if readers.iter().filter(|&&r| r).count() > 1 {
            return Err(Error::Usage(
                "only one of the CSV input, --rowfile, or --colfile may be standard input"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse the comment option. An empty string disables comments.
pub fn parse_comment(text: &str) -> Result<Option<u8>> {
    match text.chars().next() {
        None => Ok(None),
        Some(c) if c.is_ascii() => Ok(Some(c as u8)),
        Some(c) => Err(Error::Usage(format!(
            "comment character must be ASCII, got {c:?}"
        ))),
    }
}
