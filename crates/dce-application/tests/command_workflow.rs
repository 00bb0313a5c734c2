mod common;

use common::{Harness, ScriptedVcs};
use dce_core::collaborator::SymbolMap;
use dce_core::error::DceError;
use dce_core::task::{Priority, Task};

#[tokio::test]
async fn test_plain_text_is_not_a_command() {
    let h = Harness::empty();
    assert!(h.interpreter.handle("what are we working on?", &h.session).await.is_none());
    assert!(h.interpreter.handle("   ", &h.session).await.is_none());
}

#[tokio::test]
async fn test_help_aliases() {
    let h = Harness::empty();
    for input in ["/help", "/c", "/cmds", "/commands", "/h", "/HELP."] {
        let text = h.run(input).await;
        assert!(
            text.starts_with("[Commands] Available DCE Commands:"),
            "{input}: {text}"
        );
        assert!(text.contains("/complete <task-number>"));
    }
}

#[tokio::test]
async fn test_unknown_command_shows_notice_and_help() {
    let h = Harness::empty();

    let text = h.run("/frobnicate now").await;

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("[!] Unrecognized command: \"/frobnicate\""));
    assert_eq!(lines.next(), Some("[Commands] Available DCE Commands:"));
}

#[tokio::test]
async fn test_add_without_description_does_not_mutate() {
    let h = Harness::empty();

    let text = h.run("/add   ").await;

    assert_eq!(text, "[X] Please provide a task description after /add");
    assert_eq!(h.session.task_count().await, 0);
}

#[tokio::test]
async fn test_add_is_append_only() {
    let vcs = ScriptedVcs::new("/tmp/none").with_tracked(&["api/server.go", "api/client.go"]);
    let h = Harness::new(vcs, SymbolMap::new());
    h.session.append_tasks(vec![Task::new("Existing")]).await;

    let mut expected = h.session.task_count().await;
    for input in ["/add tighten server timeouts", "/a document everything", "/add server"] {
        let text = h.run(input).await;
        assert!(text.contains("[Add] Successfully added 1 task(s)"), "{text}");
        expected += 1;
        assert_eq!(h.session.task_count().await, expected);
    }

    // Adding the same text again is not deduplicated
    h.run("/add server").await;
    let tasks = h.session.tasks().await;
    assert_eq!(tasks.len(), expected + 1);
    assert_eq!(tasks[0].description, "Existing");
    assert_eq!(tasks[1].files, vec!["api/server.go"]);
    assert!(tasks[2].files.is_empty());
}

#[tokio::test]
async fn test_add_reports_builder_failure() {
    let vcs = ScriptedVcs::new("/tmp/none");
    *vcs.tracked.lock().unwrap() = Err(DceError::vcs("git ls-files", "not a git repository"));
    let h = Harness::new(vcs, SymbolMap::new());

    let text = h.run("/add anything").await;

    assert!(text.starts_with("[X] Failed to build tasks:"), "{text}");
    assert_eq!(h.session.task_count().await, 0);
}

#[tokio::test]
async fn test_tasks_listing_plain_and_verbose() {
    let h = Harness::empty();
    assert_eq!(
        h.run("/tasks").await,
        "[Task List] Current Tasks:\n  [!] No active tasks"
    );

    h.session
        .append_tasks(vec![
            Task::new("Wire the parser")
                .with_files(vec!["parse.go".to_string()])
                .with_functions(vec!["Parse".to_string()])
                .with_notes(vec!["Write unit tests".to_string(), "Add documentation".to_string()]),
        ])
        .await;

    assert_eq!(
        h.run("/t").await,
        "[Task List] Current Tasks:\n  1) Wire the parser"
    );
    let verbose = h.run("/tasks -v").await;
    assert!(verbose.contains("     Files: parse.go"));
    assert!(verbose.contains("     Functions: Parse"));
    assert!(verbose.contains("     Notes: Write unit tests; Add documentation"));
}

#[tokio::test]
async fn test_complete_then_tasks_hides_description() {
    let h = Harness::empty();
    let original = Task::new("Remove legacy flag")
        .with_files(vec!["flags.go".to_string()])
        .with_notes(vec!["Medium Priority: Important but not time-critical".to_string()]);
    h.session
        .append_tasks(vec![original.clone(), Task::new("Keep me")])
        .await;

    let text = h.run("/complete 1").await;
    assert!(text.starts_with("[Complete] Task 1 marked as completed: Remove legacy flag"));
    assert!(text.contains("Remaining tasks:\n  1) Keep me"));

    let listing = h.run("/tasks").await;
    assert!(!listing.contains("Remove legacy flag"));
    assert_eq!(h.session.completed().await, vec![original]);

    let last = h.run("/comp 1").await;
    assert!(last.ends_with("[Complete] No remaining tasks."));
}

#[tokio::test]
async fn test_complete_input_errors() {
    let h = Harness::empty();
    h.session.append_tasks(vec![Task::new("Only")]).await;

    assert_eq!(h.run("/complete").await, "[X] Usage: /complete <task-number>");
    assert_eq!(h.run("/complete one").await, "[X] Invalid task number: one");
    assert_eq!(h.run("/complete 0").await, "[X] Invalid task number: 0");
    assert_eq!(h.run("/complete 2").await, "[X] Task number out of range (1-1)");
    assert_eq!(h.session.task_count().await, 1);
}

#[tokio::test]
async fn test_priority_set_twice_keeps_single_note() {
    let h = Harness::empty();
    h.session
        .append_tasks(vec![Task::new("Cache results"), Task::new("Tidy docs")])
        .await;

    let first = h.run("/priority 1 urgent").await;
    assert_eq!(first, "[Priority] Task 1 set to High priority: Cache results");
    h.run("/p 1 high").await;

    let tasks = h.session.tasks().await;
    let priority_notes = tasks[0]
        .notes
        .iter()
        .filter(|n| n.to_lowercase().contains("priority"))
        .count();
    assert_eq!(priority_notes, 1);

    h.run("/prio 2 optional").await;
    let listing = h.run("/priority").await;
    assert_eq!(
        listing,
        "[Priority] Task Priorities:\n  1) [High] Cache results\n  2) [Low] Tidy docs"
    );
}

#[tokio::test]
async fn test_verbose_flag_is_ignored_by_priority_and_complete() {
    let h = Harness::empty();
    h.session
        .append_tasks(vec![Task::new("First"), Task::new("Second")])
        .await;

    assert_eq!(
        h.run("/priority 2 high -v").await,
        "[Priority] Task 2 set to High priority: Second"
    );
    assert_eq!(h.session.tasks().await[1].priority(), Priority::High);

    let text = h.run("/complete -v 1").await;
    assert!(text.starts_with("[Complete] Task 1 marked as completed: First"), "{text}");
    assert_eq!(h.run("/complete verbose").await, "[X] Usage: /complete <task-number>");
}

#[tokio::test]
async fn test_priority_input_errors() {
    let h = Harness::empty();
    h.session.append_tasks(vec![Task::new("Only")]).await;

    assert_eq!(
        h.run("/priority 1").await,
        "[X] Usage: /priority <task-number> <low|medium|high>"
    );
    assert_eq!(h.run("/priority x high").await, "[X] Invalid task number: x");
    assert_eq!(
        h.run("/priority 1 someday").await,
        "[X] Invalid priority level: someday. Use low, medium, or high"
    );
    assert_eq!(
        h.run("/priority 4 low").await,
        "[X] Task number out of range (1-1)"
    );
    assert!(h.session.tasks().await[0].notes.is_empty());
}

#[tokio::test]
async fn test_dce_toggles_are_idempotent() {
    let h = Harness::empty();

    assert_eq!(h.run("/dce").await, "[!] Usage: /dce on|off|status");
    assert_eq!(h.run("/dce on").await, "[DCE] Dynamic Context Engine activated");
    assert_eq!(h.run("/d start").await, "[DCE] DCE is already active");
    assert!(h.session.is_active().await);
    assert!(h.run("/dce info").await.contains("Status: ACTIVE"));
    assert_eq!(h.run("/dce off").await, "[DCE] Dynamic Context Engine deactivated");
    assert_eq!(h.run("/dce stop").await, "[DCE] DCE is already inactive");
    assert!(!h.session.is_active().await);
    assert_eq!(
        h.run("/dce sideways").await,
        "[X] Unknown DCE command: sideways. Use on, off, or status"
    );
}

#[tokio::test]
async fn test_status_reports_engine_state() {
    let h = Harness::empty();
    h.session.append_tasks(vec![Task::new("a"), Task::new("b")]).await;

    let text = h.run("/status").await;

    assert!(text.starts_with("[DCE Status] Engine Status:"));
    assert!(text.contains("  Status: INACTIVE"));
    assert!(text.contains("  Active Tasks: 2"));
    assert!(text.contains("  Monitoring Interval: 10s"));
}

#[tokio::test]
async fn test_refresh_success_and_failure() {
    let h = Harness::empty();
    h.vcs
        .set_diff(Ok("+++ b/foo.go\n+func Serve(addr string) error {\n".to_string()));

    let text = h.run("/refresh").await;
    assert!(text.starts_with("[Refresh] Refreshing task list from git changes..."));
    assert!(text.contains("[Refresh] Task list updated with latest changes"));
    assert_eq!(h.session.tasks().await[0].description, "New function: Serve");

    h.vcs.set_diff(Err(DceError::vcs("git diff", "index.lock exists")));
    let failed = h.run("/r").await;
    assert!(failed.contains("[X] Failed to refresh task list:"), "{failed}");
    assert_eq!(h.session.task_count().await, 1);
}
