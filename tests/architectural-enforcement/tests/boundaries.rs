//! Layering and coding-rule checks across the workspace

use std::fs;

use architectural_enforcement::{find_violations, report, rust_sources, workspace_root};

const CORE: &str = "orchestrator/core/src";
const TUI: &str = "tui/src";

#[test]
fn test_core_is_headless() {
    let violations = find_violations(CORE, &["ratatui", "crossterm"]);
    assert!(
        violations.is_empty(),
        "terminal crates used in the engine:\n{}",
        report(&violations)
    );

    let manifest = fs::read_to_string(workspace_root().join("orchestrator/core/Cargo.toml"))
        .expect("core manifest");
    assert!(!manifest.contains("ratatui"));
    assert!(!manifest.contains("crossterm"));
}

#[test]
fn test_core_never_sleeps() {
    let violations = find_violations(CORE, &["thread::sleep", "time::sleep", "Instant::now"]);
    assert!(
        violations.is_empty(),
        "wall-clock timing in the engine:\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_unwrap_in_production_code() {
    for dir in [CORE, TUI] {
        let violations = find_violations(dir, &[".unwrap()", ".expect("]);
        assert!(
            violations.is_empty(),
            "unwrap/expect outside tests:\n{}",
            report(&violations)
        );
    }
}

#[test]
fn test_views_do_not_drive_the_orchestrator() {
    let violations = find_violations(
        "tui/src/views",
        &["TransitionOrchestrator", "request_navigate", "RouteHost"],
    );
    assert!(
        violations.is_empty(),
        "views must return ViewAction::Navigate instead:\n{}",
        report(&violations)
    );
}

#[test]
fn test_sources_found() {
    assert!(!rust_sources(CORE).is_empty());
    assert!(!rust_sources(TUI).is_empty());
}
