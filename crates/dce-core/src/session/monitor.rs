//! Background diff polling for a session.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::model::DceSession;

impl DceSession {
    /// Starts the background monitor if it is not already running.
    ///
    /// Returns `false` when the monitor was already active.
    pub async fn start_monitoring(self: &Arc<Self>) -> bool {
        let token = {
            let mut state = self.state.write().await;
            if state.monitor_active {
                return false;
            }
            let token = CancellationToken::new();
            state.monitor_active = true;
            state.cancel = Some(token.clone());
            token
        };

        let session = Arc::clone(self);
        tokio::spawn(async move { session.monitor_loop(token).await });
        tracing::info!("[{}] Background monitor started", self.conversation_id());
        true
    }

    /// Clears the active flag and signals the monitor to exit.
    ///
    /// An iteration already past its sleep finishes before the loop exits.
    /// Returns `false` when the monitor was not active.
    pub async fn stop_monitoring(&self) -> bool {
        let mut state = self.state.write().await;
        if !state.monitor_active {
            return false;
        }
        state.monitor_active = false;
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        tracing::info!("[{}] Background monitor stopped", self.conversation_id());
        true
    }

    async fn monitor_loop(self: Arc<Self>, token: CancellationToken) {
        loop {
            let interval = self.poll_interval().await;
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            if token.is_cancelled() || !self.is_active().await {
                break;
            }

            match self.refresh().await {
                Ok(outcome) if !outcome.is_empty() => tracing::info!(
                    "[{}] Task list updated: {} created, {} completed, {} annotated",
                    self.conversation_id(),
                    outcome.created,
                    outcome.completed,
                    outcome.annotated
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!("[{}] Poll failed: {}", self.conversation_id(), e),
            }
        }
        tracing::debug!("[{}] Monitor loop exited", self.conversation_id());
    }
}
