//! Error and result types.

use std::io;
use std::path::PathBuf;

use ndarray::ShapeError;
use thiserror::Error;

/// `Result` type alias for operations that can lead to errors.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Errors in reading or writing embeddings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The embedding file does not exist.
    #[error("No such file: {path:?}")]
    FileNotFound { path: PathBuf },

    /// The word2vec header is not of the form `<vocab size> <dims>`.
    #[error("Invalid header: {0}")]
    HeaderFormat(String),

    /// A word is not valid in the declared encoding.
    #[error("Word at row {row} is not valid {encoding}")]
    Decode { row: usize, encoding: &'static str },

    /// A word cannot be represented in the declared encoding.
    #[error("Word at row {row} cannot be encoded as {encoding}")]
    Encode { row: usize, encoding: &'static str },

    /// The data ended before the row was complete.
    #[error("Truncated embedding at row {row}: {desc}")]
    TruncatedPayload { row: usize, desc: String },

    /// A row does not have the dimensionality of the table.
    #[error("Incorrect embedding dimensionality at row {row}, expected: {expected}, got: {found}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The number of words does not match the number of matrix rows.
    #[error("Vocabulary has {words} words, but the matrix has {rows} rows")]
    ShapeMismatch { words: usize, rows: usize },

    /// Malformed row.
    #[error("Invalid row {row}: {desc}")]
    Format { row: usize, desc: String },

    /// The encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The encoding cannot be used with whitespace-delimited formats.
    #[error("Encoding is not ASCII-compatible: {0}")]
    UnsupportedEncoding(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// `ndarray` shape error.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// I/O error while reading embeddings.
    #[error("{desc}: {error}")]
    Read {
        desc: String,
        #[source]
        error: io::Error,
    },

    /// I/O error while writing embeddings.
    #[error("{desc}: {error}")]
    Write {
        desc: String,
        #[source]
        error: io::Error,
    },
}

impl Error {
    pub fn read_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Read {
            desc: desc.into(),
            error,
        }
    }

    pub fn write_error(desc: impl Into<String>, error: io::Error) -> Self {
        Error::Write {
            desc: desc.into(),
            error,
        }
    }

    pub(crate) fn truncated(row: usize, desc: impl Into<String>) -> Self {
        Error::TruncatedPayload {
            row,
            desc: desc.into(),
        }
    }

    pub(crate) fn format(row: usize, desc: impl Into<String>) -> Self {
        Error::Format {
            row,
            desc: desc.into(),
        }
    }
}
