//! Application entry points for starting, querying and driving DCE sessions.

use std::sync::Arc;

use uuid::Uuid;

use dce_core::augment::{augment_context, render_context_summary};
use dce_core::collaborator::{ChatMessage, SymbolExtractor, VcsClient};
use dce_core::config::DceConfig;
use dce_core::diff::ReconcileOutcome;
use dce_core::error::Result;
use dce_core::session::{DceSession, SessionRegistry};

use crate::command::{CommandInterpreter, CommandOutput};
use crate::task_builder::{TaskBuildResult, TaskBuilder};

/// A newly created, registered and monitored session.
pub struct Activation {
    pub session: Arc<DceSession>,
    pub log_lines: Vec<String>,
    pub task_count: usize,
}

/// Wires the task builder, registry and interpreter around one repository.
pub struct DceService {
    config: DceConfig,
    vcs: Arc<dyn VcsClient>,
    builder: Arc<TaskBuilder>,
    interpreter: CommandInterpreter,
    registry: Arc<SessionRegistry>,
}

impl DceService {
    /// Creates a service with an empty registry.
    ///
    /// # Arguments
    ///
    /// * `config` - Poll interval, timeouts and snapshot limits
    /// * `vcs` - Repository queries shared by every session
    /// * `symbols` - Project symbol index used when building tasks
    pub fn new(
        config: DceConfig,
        vcs: Arc<dyn VcsClient>,
        symbols: Arc<dyn SymbolExtractor>,
    ) -> Self {
        let builder = Arc::new(TaskBuilder::new(
            Arc::clone(&vcs),
            symbols,
            config.collaborator_timeout(),
        ));
        Self {
            interpreter: CommandInterpreter::new(Arc::clone(&builder)),
            config,
            vcs,
            builder,
            registry: Arc::new(SessionRegistry::new()),
        }
    }

    pub fn config(&self) -> &DceConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    /// Builds a task list without touching any session.
    pub async fn build_task_list(&self, free_text: &str) -> Result<TaskBuildResult> {
        self.builder.build_task_list(free_text).await
    }

    /// Starts a session under a fresh `dce-<uuid>` conversation id.
    pub async fn activate(&self, free_text: &str) -> Result<Activation> {
        let conversation_id = format!("dce-{}", Uuid::new_v4());
        self.create_session(&conversation_id, free_text).await
    }

    /// Builds tasks for `free_text`, registers a session holding them and
    /// starts its monitor.
    ///
    /// # Errors
    ///
    /// Returns the task builder's error (nothing is registered), or
    /// `InvalidInput` if `conversation_id` is taken.
    pub async fn create_session(&self, conversation_id: &str, free_text: &str) -> Result<Activation> {
        let built = self.builder.build_task_list(free_text).await?;

        let session = Arc::new(DceSession::new(
            conversation_id,
            Arc::clone(&self.vcs),
            &self.config,
        ));
        let task_count = session.append_tasks(built.tasks).await;
        session.merge_snapshots(built.snapshots).await;

        self.registry.add(Arc::clone(&session)).await?;
        session.start_monitoring().await;

        tracing::info!(
            "[{}] Session activated with {} task(s)",
            conversation_id,
            task_count
        );
        Ok(Activation {
            session,
            log_lines: built.log_lines,
            task_count,
        })
    }

    /// Looks up a registered session.
    pub async fn session(&self, conversation_id: &str) -> Result<Arc<DceSession>> {
        self.registry.get(conversation_id).await
    }

    pub async fn sessions(&self) -> Vec<Arc<DceSession>> {
        self.registry.list().await
    }

    /// Stops a session's monitor. The session stays registered.
    ///
    /// Returns `false` if it was already inactive.
    pub async fn deactivate(&self, conversation_id: &str) -> Result<bool> {
        let session = self.registry.get(conversation_id).await?;
        Ok(session.stop_monitoring().await)
    }

    /// Stops every running monitor.
    pub async fn shutdown(&self) {
        for session in self.registry.list().await {
            session.stop_monitoring().await;
        }
    }

    /// Runs one refresh cycle for a session.
    pub async fn refresh(&self, conversation_id: &str) -> Result<ReconcileOutcome> {
        self.registry.get(conversation_id).await?.refresh().await
    }

    /// Interprets `input` against a session; `Ok(None)` means not a command.
    pub async fn handle_command(
        &self,
        conversation_id: &str,
        input: &str,
    ) -> Result<Option<CommandOutput>> {
        let session = self.registry.get(conversation_id).await?;
        Ok(self.interpreter.handle(input, &session).await)
    }

    /// Prepends DCE instructions and the session's task context to `prior`.
    pub async fn augment(
        &self,
        conversation_id: &str,
        prior: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>> {
        let session = self.registry.get(conversation_id).await?;
        let snapshot = session.snapshot().await;
        let summary = render_context_summary(&snapshot, self.config.snapshot_char_limit);
        Ok(augment_context(prior, &summary))
    }
}
