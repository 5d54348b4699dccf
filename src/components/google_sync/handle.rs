use super::actor::GoogleSyncActorHandle;
use super::models::SyncOutcome;
use crate::config::Config;
use crate::error::AppResult;
use crate::record::EventRecord;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google sync actor
#[derive(Clone)]
pub struct GoogleSyncHandle {
    actor_handle: GoogleSyncActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleSyncHandle {
    /// Create a new GoogleSyncHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>, timeout: Duration) -> AppResult<Self> {
        use super::actor::GoogleSyncActor;

        // Create the actor and get its handle
        let (mut actor, handle) = GoogleSyncActor::new(config, timeout)?;

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        })
    }

    /// Push one event record to the collaborator endpoint
    pub async fn push_event(&self, record: EventRecord) -> AppResult<SyncOutcome> {
        self.actor_handle.push_event(record).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}
