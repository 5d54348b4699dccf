use super::actor::ContextMenuActorHandle;
use super::models::{Anchor, MenuState};
use crate::error::AppResult;
use crate::record::EventRecord;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the context menu actor
#[derive(Clone)]
pub struct ContextMenuHandle {
    actor_handle: ContextMenuActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl ContextMenuHandle {
    /// Create a new ContextMenuHandle and spawn the actor
    pub fn new() -> Self {
        use super::actor::ContextMenuActor;

        // Create the actor and get its handle
        let (mut actor, handle) = ContextMenuActor::new();

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Attach a record and show the menu at the pointer anchor
    pub async fn open(&self, record: EventRecord, anchor: Anchor) -> AppResult<()> {
        self.actor_handle.open(record, anchor).await
    }

    /// Hide the menu
    pub async fn dismiss(&self) -> AppResult<()> {
        self.actor_handle.dismiss().await
    }

    /// Read the attached record regardless of visibility
    pub async fn attached(&self) -> AppResult<Option<EventRecord>> {
        self.actor_handle.attached().await
    }

    /// Read the observable menu state
    pub async fn state(&self) -> AppResult<MenuState> {
        self.actor_handle.state().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}

impl Default for ContextMenuHandle {
    fn default() -> Self {
        Self::new()
    }
}
