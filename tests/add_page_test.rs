use addpage::automation::scripted::{Call, ScriptedLauncher};
use addpage::{add_page, create_new_page, create_new_page_to, BreakKind, PageRequest, Step};
use std::path::PathBuf;

fn existing_docx(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    // The scripted backend never reads the file, it only has to exist
    std::fs::write(&path, b"placeholder").expect("Failed to create source file");
    path
}

#[cfg(test)]
mod save_path_tests {
    use super::*;

    #[test]
    fn test_no_paths_creates_and_saves_default() {
        let launcher = ScriptedLauncher::new();
        let session = add_page(&launcher, &PageRequest::new()).expect("run should succeed");

        let journal = launcher.journal();
        assert_eq!(journal.count(|c| *c == Call::Add), 1);
        assert_eq!(journal.count(|c| matches!(c, Call::Open(_))), 0);
        assert_eq!(journal.saved_to(), Some(PathBuf::from("NewDocument.docx")));
        assert_eq!(session.saved_to, PathBuf::from("NewDocument.docx"));
        assert!(!session.opened_existing);
    }

    #[test]
    fn test_existing_source_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let source = existing_docx(&dir, "report.docx");
        let launcher = ScriptedLauncher::new();

        let session = add_page(&launcher, &PageRequest::new().source(&source)).unwrap();

        let journal = launcher.journal();
        assert_eq!(journal.count(|c| *c == Call::Open(source.clone())), 1);
        assert_eq!(journal.count(|c| *c == Call::Add), 0);
        assert_eq!(journal.saved_to(), Some(source.clone()));
        assert!(session.opened_existing);
    }

    #[test]
    fn test_missing_source_creates_and_saves_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("does-not-exist.docx");
        let launcher = ScriptedLauncher::new();

        add_page(&launcher, &PageRequest::new().source(&source)).unwrap();

        let journal = launcher.journal();
        assert_eq!(journal.count(|c| *c == Call::Add), 1);
        assert_eq!(journal.count(|c| matches!(c, Call::Open(_))), 0);
        assert_eq!(journal.saved_to(), Some(source));
    }

    #[test]
    fn test_explicit_target_wins() {
        let dir = tempfile::tempdir().unwrap();
        let source = existing_docx(&dir, "report.docx");
        let target = dir.path().join("copy.docx");

        for request in [
            PageRequest::new().save_as(&target),
            PageRequest::new().source(&source).save_as(&target),
            PageRequest::new()
                .source(dir.path().join("missing.docx"))
                .save_as(&target),
        ] {
            let launcher = ScriptedLauncher::new();
            let session = add_page(&launcher, &request).unwrap();
            assert_eq!(launcher.journal().saved_to(), Some(target.clone()));
            assert_eq!(session.saved_to, target);
        }
    }

    #[test]
    fn test_configured_default_filename() {
        let launcher = ScriptedLauncher::new();
        let request = PageRequest::new().default_filename("Blank.docx");

        add_page(&launcher, &request).unwrap();
        assert_eq!(launcher.journal().saved_to(), Some(PathBuf::from("Blank.docx")));
    }
}

#[cfg(test)]
mod sequence_tests {
    use super::*;
    use addpage::WordApplication;

    #[test]
    fn test_single_break_after_move_to_end() {
        let launcher = ScriptedLauncher::new();
        add_page(&launcher, &PageRequest::new()).unwrap();

        let journal = launcher.journal();
        assert_eq!(journal.count(|c| matches!(c, Call::InsertBreak(_))), 1);

        let moved = journal.position(|c| *c == Call::MoveToEnd).unwrap();
        let inserted = journal.position(|c| matches!(c, Call::InsertBreak(_))).unwrap();
        let saved = journal.position(|c| matches!(c, Call::SaveAs(_))).unwrap();
        assert!(moved < inserted);
        assert!(inserted < saved);
    }

    #[test]
    fn test_full_call_order() {
        let launcher = ScriptedLauncher::new();
        add_page(&launcher, &PageRequest::new().visible(false)).unwrap();

        assert_eq!(
            launcher.journal().calls(),
            vec![
                Call::Launch,
                Call::SetVisible(false),
                Call::Add,
                Call::MoveToEnd,
                Call::InsertBreak(BreakKind::Page),
                Call::SaveAs(PathBuf::from("NewDocument.docx")),
            ]
        );
    }

    #[test]
    fn test_visibility_defaults_to_visible() {
        let launcher = ScriptedLauncher::new();
        let session = add_page(&launcher, &PageRequest::new()).unwrap();

        assert_eq!(launcher.journal().count(|c| *c == Call::SetVisible(true)), 1);
        assert!(session.application.is_visible());
    }

    #[test]
    fn test_requested_break_kind_is_used() {
        let launcher = ScriptedLauncher::new();
        add_page(&launcher, &PageRequest::new().break_kind(BreakKind::Column)).unwrap();

        assert_eq!(
            launcher.journal().count(|c| *c == Call::InsertBreak(BreakKind::Column)),
            1
        );
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    pub(super) fn request_for(step: Step, dir: &tempfile::TempDir) -> PageRequest {
        match step {
            // Open is only reached with an existing source
            Step::Open => PageRequest::new().source(existing_docx(dir, "in.docx")),
            _ => PageRequest::new(),
        }
    }

    #[test]
    fn test_failure_is_tagged_with_its_step() {
        let dir = tempfile::tempdir().unwrap();
        for step in Step::ALL {
            let launcher = ScriptedLauncher::new().failing_at(step);
            let err = add_page(&launcher, &request_for(step, &dir)).unwrap_err();
            assert_eq!(err.step(), Some(step), "wrong step for {step}");
        }
    }

    #[test]
    fn test_failure_is_caught_at_the_boundary() {
        let dir = tempfile::tempdir().unwrap();
        for step in Step::ALL {
            let launcher = ScriptedLauncher::new().failing_at(step);
            let outcome = create_new_page(&launcher, &request_for(step, &dir));
            assert!(outcome.is_none(), "failure at {step} should not produce a session");
        }
    }

    #[test]
    fn test_failure_does_not_roll_back() {
        let launcher = ScriptedLauncher::new().failing_at(Step::Save);
        assert!(create_new_page(&launcher, &PageRequest::new()).is_none());

        // The created document and its break were not undone
        let journal = launcher.journal();
        assert_eq!(journal.count(|c| *c == Call::Add), 1);
        assert_eq!(journal.count(|c| matches!(c, Call::InsertBreak(_))), 1);
    }

    #[test]
    fn test_no_calls_after_failure() {
        let launcher = ScriptedLauncher::new().failing_at(Step::MoveToEnd);
        let _ = add_page(&launcher, &PageRequest::new());

        let journal = launcher.journal();
        assert_eq!(journal.count(|c| matches!(c, Call::InsertBreak(_))), 0);
        assert_eq!(journal.saved_to(), None);
    }

    #[test]
    fn test_success_returns_session() {
        let launcher = ScriptedLauncher::new();
        let session = create_new_page(&launcher, &PageRequest::new());
        assert!(session.is_some());
    }
}

#[cfg(test)]
mod report_line_tests {
    use super::*;

    fn report(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_success_writes_one_line() {
        let launcher = ScriptedLauncher::new();
        let mut out = Vec::new();

        let session = create_new_page_to(&launcher, &PageRequest::new().save_as("out.docx"), &mut out);

        assert!(session.is_some());
        assert_eq!(
            report(&out),
            vec!["New page added and document saved as: out.docx".to_string()]
        );
    }

    #[test]
    fn test_every_failure_writes_one_line() {
        let dir = tempfile::tempdir().unwrap();
        for step in Step::ALL {
            let launcher = ScriptedLauncher::new().failing_at(step);
            let mut out = Vec::new();

            let request = failure_tests::request_for(step, &dir);
            assert!(create_new_page_to(&launcher, &request, &mut out).is_none());

            let lines = report(&out);
            assert_eq!(lines.len(), 1, "failure at {step} wrote {lines:?}");
            assert!(lines[0].starts_with("An error occurred: "));
            assert!(out.ends_with(b"\n"));
        }
    }
}
