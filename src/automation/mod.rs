//! Automation surface for word-processing applications
//!
//! The page-append sequence only talks to these traits. A backend supplies an
//! application that can be launched, whose documents can be opened or
//! created, moved to their end, given a break and saved.

pub mod scripted;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Kind of break to insert at the insertion point
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    /// Start a new page
    #[default]
    Page,
    /// Start a new column
    Column,
    /// Start a new line without ending the paragraph
    Line,
}

impl BreakKind {
    /// Value of the `w:type` attribute, `None` for a plain text wrap.
    pub fn ooxml_type(&self) -> Option<&'static str> {
        match self {
            BreakKind::Page => Some("page"),
            BreakKind::Column => Some("column"),
            BreakKind::Line => None,
        }
    }
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BreakKind::Page => "page",
            BreakKind::Column => "column",
            BreakKind::Line => "line",
        };
        f.write_str(name)
    }
}

/// Starts or attaches to an application instance.
pub trait Launcher {
    type Application: WordApplication;

    fn launch(&self) -> Result<Self::Application>;
}

/// A running application instance.
///
/// The instance is owned by the caller once launched. Nothing in this crate
/// closes it.
pub trait WordApplication {
    type Document: WordDocument;

    fn set_visible(&mut self, visible: bool) -> Result<()>;

    fn is_visible(&self) -> bool;

    /// Open an existing document.
    fn open(&mut self, path: &Path) -> Result<Self::Document>;

    /// Create a new blank document.
    fn add(&mut self) -> Result<Self::Document>;

    /// Number of documents handed out by this instance so far.
    fn document_count(&self) -> usize;
}

/// A document owned by a running application.
pub trait WordDocument {
    /// Collapse the insertion point to the end of the content.
    fn move_to_end(&mut self) -> Result<()>;

    /// Insert a break at the insertion point.
    fn insert_break(&mut self, kind: BreakKind) -> Result<()>;

    fn save_as(&mut self, path: &Path) -> Result<()>;

    /// Where the document was last opened from or saved to.
    fn path(&self) -> Option<&Path>;
}
