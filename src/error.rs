//! Error types for addpage
//!
//! Every failure in the page-append sequence is an [`Error`]. Failures that
//! happen inside the sequence are wrapped in [`Error::Step`] so callers can see
//! which call into the automation surface went wrong.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// One call in the page-append sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Starting or attaching to the application
    Launch,
    /// Opening an existing document
    Open,
    /// Creating a new blank document
    Create,
    /// Moving the insertion point to the end of the content
    MoveToEnd,
    /// Inserting the break marker
    InsertBreak,
    /// Saving the document
    Save,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Launch,
        Step::Open,
        Step::Create,
        Step::MoveToEnd,
        Step::InsertBreak,
        Step::Save,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Launch => "launch application",
            Step::Open => "open document",
            Step::Create => "create document",
            Step::MoveToEnd => "move to end of document",
            Step::InsertBreak => "insert break",
            Step::Save => "save document",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the addpage library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip container error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error in a package part
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The file is not a Word document
    #[error("Invalid file format for {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    /// A required part is missing from the package
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The main document part does not have the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A break was requested before the insertion point was placed
    #[error("Insertion point has not been placed; move to the end of the document first")]
    CursorNotPlaced,

    /// Failure reported by the automation backend itself
    #[error("{0}")]
    Backend(String),

    /// A failure tagged with the step it came from
    #[error("failed to {step}: {source}")]
    Step {
        step: Step,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Tag an error with the step it came from. Already tagged errors keep
    /// their original step.
    pub fn at(self, step: Step) -> Self {
        match self {
            tagged @ Error::Step { .. } => tagged,
            other => Error::Step {
                step,
                source: Box::new(other),
            },
        }
    }

    /// The step this error originated from, if it was raised inside the sequence.
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying error with any step tag removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }
}
