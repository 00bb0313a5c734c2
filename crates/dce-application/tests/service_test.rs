mod common;

use std::sync::Arc;

use common::{ScriptedVcs, StaticSymbols};
use dce_application::DceService;
use dce_core::augment::{DCE_SYSTEM_PROMPT, EMPTY_TASKS_MESSAGE};
use dce_core::collaborator::{ChatMessage, SymbolMap};
use dce_core::config::DceConfig;
use dce_core::error::DceError;
use tempfile::TempDir;

fn service(vcs: ScriptedVcs, symbols: SymbolMap) -> DceService {
    DceService::new(
        DceConfig::default(),
        Arc::new(vcs),
        Arc::new(StaticSymbols(symbols)),
    )
}

#[tokio::test]
async fn test_activate_registers_and_monitors_session() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("router.go"), "package main\n").unwrap();
    let vcs = ScriptedVcs::new(temp.path()).with_tracked(&["router.go", "db.go"]);
    let symbols: SymbolMap = [("router.go".to_string(), vec!["Route".to_string()])].into();
    let service = service(vcs, symbols);

    let activation = service.activate("add router metrics").await.unwrap();

    let id = activation.session.conversation_id().to_string();
    assert!(id.starts_with("dce-"));
    assert_eq!(activation.task_count, 1);
    assert!(activation.log_lines[0].starts_with("Building task list from input:"));
    assert!(activation.session.is_active().await);

    let session = service.session(&id).await.unwrap();
    let tasks = session.tasks().await;
    assert_eq!(tasks[0].files, vec!["router.go"]);
    assert_eq!(tasks[0].functions, vec!["Route"]);
    assert_eq!(session.code_snapshots().await["router.go"], "package main\n");

    assert!(service.deactivate(&id).await.unwrap());
    assert!(!service.deactivate(&id).await.unwrap());
    // Deactivated sessions stay registered
    assert_eq!(service.sessions().await.len(), 1);
}

#[tokio::test]
async fn test_create_session_failure_registers_nothing() {
    let vcs = ScriptedVcs::new("/tmp/none");
    *vcs.tracked.lock().unwrap() = Err(DceError::vcs("git ls-files", "not a git repository"));
    let service = service(vcs, SymbolMap::new());

    let result = service.create_session("conv-1", "anything").await;

    assert!(result.is_err());
    assert!(service.session("conv-1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_duplicate_conversation_id_is_rejected() {
    let service = service(ScriptedVcs::new("/tmp/none"), SymbolMap::new());

    service.create_session("conv-1", "first").await.unwrap();
    let err = service.create_session("conv-1", "second").await.err().unwrap();

    assert!(matches!(err, DceError::InvalidInput(_)));
    service.shutdown().await;
}

#[tokio::test]
async fn test_handle_command_and_augment() {
    let service = service(ScriptedVcs::new("/tmp/none"), SymbolMap::new());
    service.create_session("conv-1", "write the changelog").await.unwrap();

    let output = service
        .handle_command("conv-1", "/tasks")
        .await
        .unwrap()
        .unwrap();
    assert!(output.text().contains("1) write the changelog"));
    assert!(service.handle_command("conv-1", "hello").await.unwrap().is_none());
    assert!(
        service
            .handle_command("missing", "/tasks")
            .await
            .unwrap_err()
            .is_not_found()
    );

    let prior = vec![ChatMessage::user("what next?")];
    let messages = service.augment("conv-1", &prior).await.unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, DCE_SYSTEM_PROMPT);
    assert!(messages[1].content.contains("write the changelog"));
    assert_eq!(messages[2], prior[0]);

    service.handle_command("conv-1", "/complete 1").await.unwrap();
    let messages = service.augment("conv-1", &prior).await.unwrap();
    assert_eq!(messages[1].content, EMPTY_TASKS_MESSAGE);

    service.shutdown().await;
}

#[tokio::test]
async fn test_refresh_through_service() {
    let vcs = ScriptedVcs::new("/tmp/none");
    vcs.set_diff(Ok("diff --git a/gone.go b/gone.go\ndeleted file mode 100644\n".to_string()));
    let service = service(vcs, SymbolMap::new());
    service.create_session("conv-1", "gone").await.unwrap();

    let session = service.session("conv-1").await.unwrap();
    session
        .append_tasks(vec![
            dce_core::Task::new("Clean gone.go").with_files(vec!["gone.go".to_string()]),
        ])
        .await;

    let outcome = service.refresh("conv-1").await.unwrap();

    assert_eq!(outcome.completed, 1);
    assert_eq!(session.completed().await[0].description, "Clean gone.go");
    service.shutdown().await;
}
