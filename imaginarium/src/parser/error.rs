//! The types for parser errors.

use crate::morphology::MorphologyError;
use crate::ontology::OntologyError;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for the parser.
#[derive(Debug, Error)]
pub enum ParserError {
    /// No sentence pattern matched the statement.
    #[error("I don't know how to interpret '{0}'")]
    UnknownSentencePattern(String),

    /// A pattern committed (crossed its cut) and then failed to scan a
    /// segment, or a feature check failed.
    #[error("in '{sentence}', reading it as \"{pattern}\": expected {expected}, found '{found}'")]
    Grammatical {
        sentence: String,
        /// The pattern being attempted when the cut was crossed.
        pattern: &'static str,
        /// What the segment needed next.
        expected: String,
        /// The offending input, or "end of sentence".
        found: String,
    },

    /// A list-typed property referenced a list file that could not be read.
    #[error("couldn't read list file '{path}': {source}")]
    ListFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A list file contained no usable values.
    #[error("list file '{0}' has no values in it")]
    EmptyList(PathBuf),

    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Morphology(#[from] MorphologyError),
}

/// One collected failure from loading a definition file.
#[derive(Debug)]
pub struct LoadError {
    pub file: Option<PathBuf>,
    pub line: u32,
    pub input: String,
    pub error: ParserError,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(
                f,
                "{}:{}: {} (while reading '{}')",
                file.display(),
                self.line,
                self.error,
                self.input
            ),
            None => write!(f, "line {}: {} (while reading '{}')", self.line, self.error, self.input),
        }
    }
}
