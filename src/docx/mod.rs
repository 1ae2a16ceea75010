//! Native backend for Word .docx packages
//!
//! Implements the automation surface without any external application: the
//! "application" is headless and every document is an in-memory package
//! whose main part is edited as XML text.

mod body;
mod package;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::automation::{BreakKind, Launcher, WordApplication, WordDocument};
use crate::error::{Error, Result};

use body::BodyEnd;
pub use package::MAIN_PART;
use package::{validate_docx_file, Package};

/// Launches the headless .docx application
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxLauncher;

impl Launcher for DocxLauncher {
    type Application = DocxApplication;

    fn launch(&self) -> Result<DocxApplication> {
        info!("starting native .docx backend");
        Ok(DocxApplication::default())
    }
}

/// Headless application instance
#[derive(Debug, Default)]
pub struct DocxApplication {
    visible: bool,
    documents: usize,
}

impl WordApplication for DocxApplication {
    type Document = DocxDocument;

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            debug!("native .docx backend has no window; visibility is recorded only");
        }
        self.visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn open(&mut self, path: &Path) -> Result<DocxDocument> {
        validate_docx_file(path)?;
        let document = DocxDocument::from_package(Package::read(path)?, Some(path.to_path_buf()))?;
        self.documents += 1;
        info!(path = %path.display(), parts = document.package.len(), "opened document");
        Ok(document)
    }

    fn add(&mut self) -> Result<DocxDocument> {
        let document = DocxDocument::from_package(Package::blank()?, None)?;
        self.documents += 1;
        info!("created blank document");
        Ok(document)
    }

    fn document_count(&self) -> usize {
        self.documents
    }
}

/// A .docx package held in memory
#[derive(Debug, Clone)]
pub struct DocxDocument {
    package: Package,
    xml: String,
    path: Option<PathBuf>,
    cursor: Option<BodyEnd>,
}

impl DocxDocument {
    fn from_package(package: Package, path: Option<PathBuf>) -> Result<Self> {
        let xml = package.main_xml()?;
        Ok(Self {
            package,
            xml,
            path,
            cursor: None,
        })
    }

    /// Text of the main document part, including unsaved edits.
    pub fn document_xml(&self) -> &str {
        &self.xml
    }

    pub fn page_break_count(&self) -> Result<usize> {
        body::count_breaks(&self.xml, BreakKind::Page)
    }

    pub fn break_count(&self, kind: BreakKind) -> Result<usize> {
        body::count_breaks(&self.xml, kind)
    }

    /// Number of paragraphs directly inside the body.
    pub fn paragraph_count(&self) -> Result<usize> {
        Ok(body::body_children(&self.xml)?
            .iter()
            .filter(|name| name.as_str() == "p")
            .count())
    }

    /// Local names of the body's direct children, in order.
    pub fn body_children(&self) -> Result<Vec<String>> {
        body::body_children(&self.xml)
    }
}

impl WordDocument for DocxDocument {
    fn move_to_end(&mut self) -> Result<()> {
        let end = body::locate_body_end(&mut self.xml)?;
        debug!(offset = end.offset, "insertion point moved to end of body");
        self.cursor = Some(end);
        Ok(())
    }

    fn insert_break(&mut self, kind: BreakKind) -> Result<()> {
        let mut cursor = self.cursor.take().ok_or(Error::CursorNotPlaced)?;
        cursor.offset = body::insert_break_paragraph(&mut self.xml, &cursor, kind)?;
        debug!(%kind, offset = cursor.offset, "inserted break");
        self.cursor = Some(cursor);
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> Result<()> {
        self.package.replace(MAIN_PART, self.xml.clone().into_bytes());
        self.package.write(path)?;
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), "saved document");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
