//! Appending a page to a document
//!
//! [`add_page`] runs the whole sequence and returns either the still-open
//! application and document or an error tagged with the failing [`Step`].
//! [`create_new_page`] wraps it and reports the outcome as one line on stdout.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::automation::{BreakKind, Launcher, WordApplication, WordDocument};
use crate::error::{Result, Step};

/// Filename used when neither a source nor a save target is given
pub const DEFAULT_FILENAME: &str = "NewDocument.docx";

/// What to open, where to save and how to show the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub source: Option<PathBuf>,
    pub save_as: Option<PathBuf>,
    pub visible: bool,
    pub break_kind: BreakKind,
    pub default_filename: PathBuf,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            source: None,
            save_as: None,
            visible: true,
            break_kind: BreakKind::Page,
            default_filename: PathBuf::from(DEFAULT_FILENAME),
        }
    }
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn save_as(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_as = Some(path.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn break_kind(mut self, kind: BreakKind) -> Self {
        self.break_kind = kind;
        self
    }

    pub fn default_filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_filename = path.into();
        self
    }

    /// Where the document ends up.
    pub fn save_path(&self) -> PathBuf {
        resolve_save_path(
            self.source.as_deref(),
            self.save_as.as_deref(),
            &self.default_filename,
        )
    }
}

/// Explicit target, else the source path (existing or not), else the default.
pub fn resolve_save_path(source: Option<&Path>, save_as: Option<&Path>, default: &Path) -> PathBuf {
    save_as.or(source).unwrap_or(default).to_path_buf()
}

/// Handle to the application and document left open after a successful run.
///
/// Nothing here closes either of them; keeping or dropping the handle is up
/// to the caller.
pub struct Session<A: WordApplication> {
    pub application: A,
    pub document: A::Document,
    pub saved_to: PathBuf,
    pub opened_existing: bool,
}

impl<A> fmt::Debug for Session<A>
where
    A: WordApplication + fmt::Debug,
    A::Document: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("application", &self.application)
            .field("document", &self.document)
            .field("saved_to", &self.saved_to)
            .field("opened_existing", &self.opened_existing)
            .finish()
    }
}

/// Open or create a document, append a break at its end and save it.
pub fn add_page<L: Launcher>(launcher: &L, request: &PageRequest) -> Result<Session<L::Application>> {
    let mut application = launcher.launch().map_err(|e| e.at(Step::Launch))?;
    application
        .set_visible(request.visible)
        .map_err(|e| e.at(Step::Launch))?;

    let existing = request.source.as_deref().filter(|path| path.exists());
    let mut document = match existing {
        Some(path) => {
            debug!(path = %path.display(), "opening existing document");
            application.open(path).map_err(|e| e.at(Step::Open))?
        }
        None => {
            if let Some(missing) = &request.source {
                debug!(path = %missing.display(), "source does not exist, creating a new document");
            }
            application.add().map_err(|e| e.at(Step::Create))?
        }
    };

    document.move_to_end().map_err(|e| e.at(Step::MoveToEnd))?;
    document
        .insert_break(request.break_kind)
        .map_err(|e| e.at(Step::InsertBreak))?;

    let saved_to = request.save_path();
    document.save_as(&saved_to).map_err(|e| e.at(Step::Save))?;
    info!(path = %saved_to.display(), kind = %request.break_kind, "page appended");

    Ok(Session {
        application,
        document,
        saved_to,
        opened_existing: existing.is_some(),
    })
}

/// Run [`add_page`] and report the outcome as a single line on stdout.
///
/// Never returns an error: any failure is printed and `None` is returned.
pub fn create_new_page<L: Launcher>(launcher: &L, request: &PageRequest) -> Option<Session<L::Application>> {
    create_new_page_to(launcher, request, &mut io::stdout().lock())
}

/// Like [`create_new_page`], reporting to `out` instead of stdout.
pub fn create_new_page_to<L: Launcher>(
    launcher: &L,
    request: &PageRequest,
    out: &mut impl Write,
) -> Option<Session<L::Application>> {
    let (line, session) = match add_page(launcher, request) {
        Ok(session) => (success_message(&session.saved_to), Some(session)),
        Err(e) => {
            debug!(step = ?e.step(), "page append failed");
            (failure_message(&e), None)
        }
    };
    // A closed stdout is not worth crashing the caller over
    if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
        debug!(error = %e, "could not write report line");
    }
    session
}

pub fn success_message(path: &Path) -> String {
    format!("New page added and document saved as: {}", path.display())
}

pub fn failure_message(error: &impl fmt::Display) -> String {
    let text = error.to_string();
    let text: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    format!("An error occurred: {}", text.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_prefers_explicit_target() {
        let default = Path::new(DEFAULT_FILENAME);
        assert_eq!(
            resolve_save_path(Some(Path::new("in.docx")), Some(Path::new("out.docx")), default),
            PathBuf::from("out.docx")
        );
        assert_eq!(
            resolve_save_path(None, Some(Path::new("out.docx")), default),
            PathBuf::from("out.docx")
        );
    }

    #[test]
    fn save_path_falls_back_to_source_then_default() {
        let default = Path::new(DEFAULT_FILENAME);
        assert_eq!(
            resolve_save_path(Some(Path::new("in.docx")), None, default),
            PathBuf::from("in.docx")
        );
        assert_eq!(resolve_save_path(None, None, default), PathBuf::from(DEFAULT_FILENAME));
    }

    #[test]
    fn request_defaults_to_visible_page_break() {
        let request = PageRequest::new();
        assert!(request.visible);
        assert_eq!(request.break_kind, BreakKind::Page);
        assert_eq!(request.save_path(), PathBuf::from("NewDocument.docx"));
    }

    #[test]
    fn messages() {
        assert_eq!(
            success_message(Path::new("a.docx")),
            "New page added and document saved as: a.docx"
        );
        assert_eq!(failure_message(&"boom"), "An error occurred: boom");
    }

    #[test]
    fn error_text_is_kept_on_one_line() {
        let err = crate::Error::backend("first\nsecond").at(Step::Open);
        assert_eq!(
            failure_message(&err),
            "An error occurred: failed to open document: first second"
        );
    }
}
