//! Local notification scheduler collaborator
//!
//! Notifications are keyed by the id of the reminder they belong to.
//! Cancelling a notification that already fired is not guaranteed to
//! have any effect.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Content of one scheduled notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification, replacing any pending one with the same id
    async fn schedule(&self, notification: Notification) -> Result<()>;

    /// Cancel a pending notification; unknown ids succeed
    async fn cancel(&self, id: &str) -> Result<()>;

    /// Ids of notifications that have not fired yet
    async fn pending(&self) -> Result<Vec<String>>;
}

struct Pending {
    /// Distinguishes a replaced task from its successor
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    next_generation: u64,
    tasks: HashMap<String, Pending>,
}

/// Scheduler that delivers each notification from a sleeping tokio task
///
/// Delivery is a structured log line; the device-side push is outside
/// this service.
#[derive(Clone, Default)]
pub struct TokioNotificationScheduler {
    inner: Arc<Mutex<Inner>>,
}

impl TokioNotificationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("notification scheduler state poisoned"))
    }
}

#[async_trait]
impl NotificationScheduler for TokioNotificationScheduler {
    async fn schedule(&self, notification: Notification) -> Result<()> {
        let mut inner = self.lock()?;
        inner.next_generation += 1;
        let generation = inner.next_generation;

        let delay = (notification.fire_at - Utc::now())
            .to_std()
            .unwrap_or_default();
        let state = Arc::clone(&self.inner);
        let id = notification.id.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(
                id = %notification.id,
                title = %notification.title,
                body = %notification.body,
                "Delivering notification"
            );
            if let Ok(mut inner) = state.lock() {
                if inner
                    .tasks
                    .get(&notification.id)
                    .is_some_and(|p| p.generation == generation)
                {
                    inner.tasks.remove(&notification.id);
                }
            }
        });

        if let Some(previous) = inner.tasks.insert(id.clone(), Pending { generation, handle }) {
            debug!(id = %id, "Replacing pending notification");
            previous.handle.abort();
        }
        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.tasks.remove(id) {
            Some(pending) => {
                pending.handle.abort();
                debug!(id, "Notification cancelled");
            }
            None => warn!(id, "No pending notification to cancel"),
        }
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<String>> {
        let inner = self.lock()?;
        let mut ids: Vec<String> = inner.tasks.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
