//! addpage: append a page break to the end of a Word document
//!
//! This library opens an existing .docx document (or creates a blank one),
//! moves to the end of its content, inserts a page break and saves it. The
//! application that owns the document is reached through the traits in
//! [`automation`]; [`docx`] provides a native backend that edits the package
//! directly.

pub mod automation;
pub mod config;
pub mod docx;
pub mod error;
pub mod pages;

// Re-export commonly used types
pub use automation::{BreakKind, Launcher, WordApplication, WordDocument};
pub use config::Config;
pub use docx::{DocxApplication, DocxDocument, DocxLauncher};
pub use error::{Error, Result, Step};
pub use pages::{
    add_page, create_new_page, create_new_page_to, resolve_save_path, PageRequest, Session,
};
