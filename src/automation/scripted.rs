//! Scripted stand-in for a word-processing application
//!
//! Records every call into a shared [`Journal`] instead of touching any file,
//! and can be told to fail at one [`Step`]. Used by `--dry-run` and by the
//! test-suite.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{BreakKind, Launcher, WordApplication, WordDocument};
use crate::error::{Error, Result, Step};

/// One recorded call into the automation surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Launch,
    SetVisible(bool),
    Open(PathBuf),
    Add,
    MoveToEnd,
    InsertBreak(BreakKind),
    SaveAs(PathBuf),
}

impl Call {
    /// The step of the sequence this call belongs to.
    pub fn step(&self) -> Step {
        match self {
            Call::Launch | Call::SetVisible(_) => Step::Launch,
            Call::Open(_) => Step::Open,
            Call::Add => Step::Create,
            Call::MoveToEnd => Step::MoveToEnd,
            Call::InsertBreak(_) => Step::InsertBreak,
            Call::SaveAs(_) => Step::Save,
        }
    }
}

/// Shared, ordered record of calls
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Position of the first call matching the predicate.
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(predicate)
    }

    /// Target of the last `SaveAs` call.
    pub fn saved_to(&self) -> Option<PathBuf> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            Call::SaveAs(path) => Some(path.clone()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Script {
    fail_at: Option<Step>,
}

impl Script {
    fn check(&self, step: Step) -> Result<()> {
        if self.fail_at == Some(step) {
            return Err(Error::backend(format!("scripted failure at {step}")));
        }
        Ok(())
    }
}

/// Launches [`ScriptedApplication`] instances that share one journal
#[derive(Debug, Clone, Default)]
pub struct ScriptedLauncher {
    journal: Journal,
    script: Script,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the call belonging to `step` fail after it has been recorded.
    pub fn failing_at(mut self, step: Step) -> Self {
        self.script.fail_at = Some(step);
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl Launcher for ScriptedLauncher {
    type Application = ScriptedApplication;

    fn launch(&self) -> Result<ScriptedApplication> {
        self.journal.record(Call::Launch);
        self.script.check(Step::Launch)?;
        Ok(ScriptedApplication {
            journal: self.journal.clone(),
            script: self.script,
            visible: false,
            documents: 0,
        })
    }
}

#[derive(Debug)]
pub struct ScriptedApplication {
    journal: Journal,
    script: Script,
    visible: bool,
    documents: usize,
}

impl ScriptedApplication {
    fn document(&mut self, path: Option<PathBuf>) -> ScriptedDocument {
        self.documents += 1;
        ScriptedDocument {
            journal: self.journal.clone(),
            script: self.script,
            path,
            at_end: false,
        }
    }
}

impl WordApplication for ScriptedApplication {
    type Document = ScriptedDocument;

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.journal.record(Call::SetVisible(visible));
        self.script.check(Step::Launch)?;
        self.visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn open(&mut self, path: &Path) -> Result<ScriptedDocument> {
        self.journal.record(Call::Open(path.to_path_buf()));
        self.script.check(Step::Open)?;
        Ok(self.document(Some(path.to_path_buf())))
    }

    fn add(&mut self) -> Result<ScriptedDocument> {
        self.journal.record(Call::Add);
        self.script.check(Step::Create)?;
        Ok(self.document(None))
    }

    fn document_count(&self) -> usize {
        self.documents
    }
}

#[derive(Debug)]
pub struct ScriptedDocument {
    journal: Journal,
    script: Script,
    path: Option<PathBuf>,
    at_end: bool,
}

impl WordDocument for ScriptedDocument {
    fn move_to_end(&mut self) -> Result<()> {
        self.journal.record(Call::MoveToEnd);
        self.script.check(Step::MoveToEnd)?;
        self.at_end = true;
        Ok(())
    }

    fn insert_break(&mut self, kind: BreakKind) -> Result<()> {
        self.journal.record(Call::InsertBreak(kind));
        self.script.check(Step::InsertBreak)?;
        if !self.at_end {
            return Err(Error::CursorNotPlaced);
        }
        Ok(())
    }

    fn save_as(&mut self, path: &Path) -> Result<()> {
        self.journal.record(Call::SaveAs(path.to_path_buf()));
        self.script.check(Step::Save)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
