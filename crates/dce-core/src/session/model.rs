use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::collaborator::{DiffMode, VcsClient, with_timeout};
use crate::config::DceConfig;
use crate::diff::{ChangeEvent, ReconcileOutcome, parse_diff, reconcile};
use crate::error::{DceError, Result};
use crate::task::{Priority, Task};

/// Everything guarded by the session lock.
#[derive(Debug)]
pub(super) struct SessionState {
    pub(super) tasks: Vec<Task>,
    pub(super) completed: Vec<Task>,
    pub(super) code_snapshots: HashMap<String, String>,
    pub(super) monitor_active: bool,
    pub(super) poll_interval: Duration,
    pub(super) cancel: Option<CancellationToken>,
}

/// A point-in-time copy of a session, taken under the read lock.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub tasks: Vec<Task>,
    pub completed: Vec<Task>,
    pub code_snapshots: HashMap<String, String>,
    pub monitor_active: bool,
    pub poll_interval: Duration,
}

/// Ephemeral, lock-protected state for one conversation.
///
/// All task, snapshot and monitor fields live behind a single
/// [`tokio::sync::RwLock`]. Collaborator calls are awaited before the lock is
/// taken; only their results are applied under it.
pub struct DceSession {
    conversation_id: String,
    pub(super) vcs: Arc<dyn VcsClient>,
    pub(super) collaborator_timeout: Duration,
    pub(super) state: RwLock<SessionState>,
}

impl std::fmt::Debug for DceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DceSession")
            .field("conversation_id", &self.conversation_id)
            .field("collaborator_timeout", &self.collaborator_timeout)
            .finish_non_exhaustive()
    }
}

impl DceSession {
    /// Creates an inactive session with no tasks.
    ///
    /// # Arguments
    ///
    /// * `conversation_id` - Unique key for the registry
    /// * `vcs` - Client used by refresh cycles
    /// * `config` - Supplies the poll interval and collaborator timeout
    pub fn new(
        conversation_id: impl Into<String>,
        vcs: Arc<dyn VcsClient>,
        config: &DceConfig,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            vcs,
            collaborator_timeout: config.collaborator_timeout(),
            state: RwLock::new(SessionState {
                tasks: Vec::new(),
                completed: Vec::new(),
                code_snapshots: HashMap::new(),
                monitor_active: false,
                poll_interval: config.poll_interval(),
                cancel: None,
            }),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn vcs(&self) -> &Arc<dyn VcsClient> {
        &self.vcs
    }

    pub fn collaborator_timeout(&self) -> Duration {
        self.collaborator_timeout
    }

    // ============================================================================
    // Reads (copies taken under the shared lock)
    // ============================================================================

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn completed(&self) -> Vec<Task> {
        self.state.read().await.completed.clone()
    }

    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn code_snapshots(&self) -> HashMap<String, String> {
        self.state.read().await.code_snapshots.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            tasks: state.tasks.clone(),
            completed: state.completed.clone(),
            code_snapshots: state.code_snapshots.clone(),
            monitor_active: state.monitor_active,
            poll_interval: state.poll_interval,
        }
    }

    /// Whether the background monitor should keep running.
    pub async fn is_active(&self) -> bool {
        self.state.read().await.monitor_active
    }

    pub async fn poll_interval(&self) -> Duration {
        self.state.read().await.poll_interval
    }

    // ============================================================================
    // Writes
    // ============================================================================

    /// Appends tasks in order and returns the new active count.
    pub async fn append_tasks(&self, tasks: Vec<Task>) -> usize {
        let mut state = self.state.write().await;
        state.tasks.extend(tasks);
        state.tasks.len()
    }

    /// Merges file contents into the snapshot map; later writes win.
    pub async fn merge_snapshots(&self, snapshots: HashMap<String, String>) {
        if snapshots.is_empty() {
            return;
        }
        self.state.write().await.code_snapshots.extend(snapshots);
    }

    /// Replaces the priority notes of the task at 1-based `number`.
    ///
    /// # Errors
    ///
    /// Returns [`DceError::TaskIndexOutOfRange`] when `number` is 0 or past the
    /// end of the active list.
    pub async fn set_priority(&self, number: usize, priority: Priority) -> Result<Task> {
        let mut state = self.state.write().await;
        let len = state.tasks.len();
        if number == 0 || number > len {
            return Err(DceError::TaskIndexOutOfRange { index: number, len });
        }
        let task = &mut state.tasks[number - 1];
        task.set_priority(priority);
        Ok(task.clone())
    }

    /// Moves the task at 1-based `number` to the completed set.
    ///
    /// Returns the completed task and a copy of the remaining active tasks.
    ///
    /// # Errors
    ///
    /// Returns [`DceError::TaskIndexOutOfRange`] for an invalid `number`.
    pub async fn complete_task(&self, number: usize) -> Result<(Task, Vec<Task>)> {
        let mut state = self.state.write().await;
        let len = state.tasks.len();
        if number == 0 || number > len {
            return Err(DceError::TaskIndexOutOfRange { index: number, len });
        }
        let task = state.tasks.remove(number - 1);
        state.completed.push(task.clone());
        Ok((task, state.tasks.clone()))
    }

    /// Applies already-parsed events under the write lock.
    pub async fn apply_events(&self, events: &[ChangeEvent]) -> ReconcileOutcome {
        if events.is_empty() {
            return ReconcileOutcome::default();
        }
        let mut state = self.state.write().await;
        let SessionState {
            tasks, completed, ..
        } = &mut *state;
        reconcile(events, tasks, completed)
    }

    /// Runs one diff-parse-and-reconcile cycle.
    ///
    /// The diff is fetched first with no lock held; failure there aborts the
    /// cycle. Untracked files are best-effort and become `NewFile` events.
    ///
    /// # Errors
    ///
    /// Returns the VCS or timeout error from the diff call.
    pub async fn refresh(&self) -> Result<ReconcileOutcome> {
        let diff = with_timeout(
            "git diff",
            self.collaborator_timeout,
            self.vcs.diff_since_last_poll(DiffMode::Unified0),
        )
        .await?;

        let mut events = parse_diff(&diff);

        match with_timeout(
            "git ls-files --others",
            self.collaborator_timeout,
            self.vcs.list_untracked_files(),
        )
        .await
        {
            Ok(untracked) => events.extend(untracked.into_iter().map(ChangeEvent::new_file)),
            Err(e) => tracing::warn!("Skipping untracked files this cycle: {}", e),
        }

        let outcome = self.apply_events(&events).await;
        tracing::debug!(
            "[{}] refresh applied {} events: {:?}",
            self.conversation_id,
            events.len(),
            outcome
        );
        Ok(outcome)
    }
}
