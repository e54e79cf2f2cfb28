//! Named inputs and line-oriented specification files.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};
use crate::filter::{Axis, RangeFilter};

/// A file path, or standard input when given as `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Input::Stdin
        } else {
            Input::Path(PathBuf::from(arg))
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Input::Stdin)
    }

    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            Input::Stdin => Ok(Box::new(io::stdin())),
            Input::Path(path) => File::open(path)
                .map(|f| Box::new(f) as Box<dyn Read>)
                .map_err(|source| Error::Source {
                    name: self.to_string(),
                    source,
                }),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => write!(f, "standard input"),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Apply every line of a specification file to `filter`.
///
/// Returns the number of fragments applied.
pub fn apply_spec_file(filter: &mut RangeFilter, axis: Axis, input: &Input) -> Result<usize> {
    let reader = BufReader::new(input.open()?);
    apply_spec_lines(filter, axis, &input.to_string(), reader)
}

/// Apply each line of `reader` as one fragment, then seal the filter. The
/// first malformed line, blank ones included, aborts with its line number.
pub fn apply_spec_lines<R: BufRead>(
    filter: &mut RangeFilter,
    axis: Axis,
    name: &str,
    reader: R,
) -> Result<usize> {
    let mut applied = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Source {
            name: name.to_string(),
            source,
        })?;
        info!("processing {axis} ranges {line:?} from {name}");
        filter
            .update(&line)
            .map_err(|source| Error::InvalidRange {
                axis,
                origin: format!("{name}:{}", idx + 1),
                source,
            })?;
        applied += 1;
    }
    filter.seal();
    Ok(applied)
}
