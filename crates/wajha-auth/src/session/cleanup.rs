//! Periodic eviction of expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use super::manager::SessionManager;

/// Background task that sweeps expired sessions from the store.
#[derive(Debug)]
pub struct SessionCleanup {
    /// Session store to sweep
    sessions: Arc<SessionManager>,
    /// Sweep interval
    interval: Duration,
}

impl SessionCleanup {
    /// Create a new cleanup task
    pub fn new(sessions: Arc<SessionManager>, interval_minutes: u64) -> Self {
        Self {
            sessions,
            interval: Duration::from_secs(interval_minutes * 60),
        }
    }

    /// Run the sweep loop (runs until the token is cancelled)
    pub async fn run(&self, cancel: tokio::sync::watch::Receiver<bool>) {
        tracing::info!(
            "Session cleanup started, interval={}s",
            self.interval.as_secs()
        );

        let mut interval = time::interval(self.interval);
        let mut cancel = cancel;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.sessions.sweep() {
                        Ok(0) => tracing::trace!("No expired sessions"),
                        Ok(evicted) => tracing::debug!("Evicted {} expired sessions", evicted),
                        Err(e) => tracing::error!("Session sweep failed: {}", e),
                    }
                }
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        tracing::info!("Session cleanup shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_cancel_stops_loop() {
        let sessions = Arc::new(SessionManager::new(chrono::Duration::hours(1)));
        sessions.establish(Uuid::new_v4()).unwrap();

        let cleanup = SessionCleanup::new(sessions.clone(), 60);
        let (tx, rx) = tokio::sync::watch::channel(false);

        let handle = tokio::spawn(async move { cleanup.run(rx).await });
        tx.send(true).unwrap();
        handle.await.unwrap();

        // Non-expired session untouched by the first tick's sweep.
        assert_eq!(sessions.len(), 1);
    }
}
