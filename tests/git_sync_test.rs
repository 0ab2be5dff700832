//! End-to-end directory sync against real git repositories

mod common;

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use common::{MockTransport, create_test_repo, prompt, view_config};
use cwdsync::reconciler::ReconcileOutcome;
use cwdsync::resolver::GitResolver;
use cwdsync::terminal::TerminalView;

fn canonical(dir: &TempDir) -> String {
    fs::canonicalize(dir.path())
        .expect("Failed to canonicalize")
        .to_string_lossy()
        .into_owned()
}

async fn feed(view: &mut TerminalView, chunk: &[u8]) -> Vec<ReconcileOutcome> {
    let mut outcomes = Vec::new();
    for handle in view.handle_output(chunk) {
        outcomes.push(handle.await.expect("reconcile task panicked"));
    }
    outcomes
}

#[tokio::test]
async fn test_shell_entering_and_leaving_repository() {
    let repo = create_test_repo();
    let outside = TempDir::new().unwrap();
    let root = canonical(&repo);
    let name = repo.path().file_name().unwrap().to_string_lossy().into_owned();

    let mut view = TerminalView::new(
        Arc::new(MockTransport::new()),
        Arc::new(GitResolver::new()),
        view_config(),
        None,
    );

    let outcomes = feed(&mut view, &prompt(&format!("{}/src/nested", root))).await;
    assert_eq!(
        outcomes,
        vec![ReconcileOutcome::Resolved {
            root: root.clone(),
            root_changed: true
        }]
    );
    {
        let store = view.store().lock().unwrap();
        let slot = store.active().unwrap();
        assert_eq!(slot.label, name);
        assert_eq!(slot.filepath, root);
        assert_eq!(store.active_view().branch.as_deref(), Some("main"));
        assert_eq!(store.active_view().siblings, vec!["feature"]);
    }

    let outcomes = feed(&mut view, &prompt(&canonical(&outside))).await;
    assert_eq!(outcomes, vec![ReconcileOutcome::Cleared]);
    {
        let store = view.store().lock().unwrap();
        assert_eq!(store.active().unwrap().label, "terminal");
        assert!(!store.active_view().branch_visible());
        assert!(!store.active_view().siblings_visible());
    }
}

#[tokio::test]
async fn test_file_uri_only_marker_with_escaped_path() {
    let repo = create_test_repo();
    let root = canonical(&repo);
    let spaced = format!("{}/dir with space", root);
    fs::create_dir_all(&spaced).unwrap();

    let mut view = TerminalView::new(
        Arc::new(MockTransport::new()),
        Arc::new(GitResolver::new()),
        view_config(),
        None,
    );

    let encoded = spaced.replace(' ', "%20");
    let chunk = format!("\x1b]7;file://localhost{}\x1b\\$ ", encoded);
    let outcomes = feed(&mut view, chunk.as_bytes()).await;

    assert_eq!(
        outcomes,
        vec![ReconcileOutcome::Resolved {
            root,
            root_changed: true
        }]
    );
}
