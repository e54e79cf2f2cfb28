//! Error types for csvcol.

use std::io;

use thiserror::Error;

use crate::filter::Axis;
use crate::range::InvalidRangeError;

/// Broad category of a failure, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    InvalidRange,
    SourceUnavailable,
    Decode,
    Encode,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::InvalidRange => 3,
            ErrorKind::SourceUnavailable => 4,
            ErrorKind::Decode => 5,
            ErrorKind::Encode => 6,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("unable to process {axis} ranges from {origin}: {source}")]
    InvalidRange {
        axis: Axis,
        origin: String,
        source: InvalidRangeError,
    },

    #[error("unable to read {name}: {source}")]
    Source { name: String, source: io::Error },

    #[error("error decoding record {row} of {name}: {source}")]
    Decode {
        name: String,
        row: usize,
        source: csv::Error,
    },

    #[error("error writing output: {0}")]
    Encode(#[source] csv::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Usage(_) => ErrorKind::Usage,
            Error::InvalidRange { .. } => ErrorKind::InvalidRange,
            Error::Source { .. } => ErrorKind::SourceUnavailable,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Encode(_) => ErrorKind::Encode,
        }
    }
}

impl From<io::Error> for Error {
    /// I/O errors outside of a named source come from the output side.
    fn from(e: io::Error) -> Self {
        Error::Encode(csv::Error::from(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
