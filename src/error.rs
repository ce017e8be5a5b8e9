//! Error types for the analyzer front end
//!
//! [`AnalyzeError`] wraps lexical and syntax errors together with the I/O
//! failures of the batch driver. Lex and parse errors are fatal for the
//! compilation unit they occur in; whether they stop a batch is up to the
//! caller (see [`crate::analyzer::Options::keep_going`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;

/// The result of an analyzer operation.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// An error raised while analyzing one or more compilation units.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The source text could not be tokenized
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The token stream is not a valid class
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading a source file or directory failed
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing an output file failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory held no `.jack` files
    #[error("no .jack files found in {}", .0.display())]
    NoSources(PathBuf),

    /// An error tied to a particular source file
    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<AnalyzeError>,
    },
}

impl AnalyzeError {
    /// Attach the source file the error came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        AnalyzeError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
