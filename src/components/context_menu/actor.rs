use super::models::{Anchor, MenuState};
use crate::error::{component_error, AppResult};
use crate::record::EventRecord;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The single attachment slot behind the context menu.
///
/// Hiding only clears the visible flag; the stored record is kept until
/// the next attach overwrites it. Action handlers capture the record in
/// the same click dispatch that hides the menu, so a "stale" record is
/// still the one the user right-clicked.
#[derive(Debug, Default)]
struct MenuSlot {
    attached: Option<EventRecord>,
    visible: bool,
    anchor: Anchor,
}

/// The context menu actor: the one writer of the attachment slot
pub struct ContextMenuActor {
    slot: MenuSlot,
    command_rx: mpsc::Receiver<ContextMenuCommand>,
}

/// Commands that can be sent to the context menu actor
pub enum ContextMenuCommand {
    /// Attach a record and show the menu at the anchor
    Open { record: EventRecord, anchor: Anchor },
    /// Hide the menu, keeping the slot content
    Dismiss,
    /// Read the currently attached record, visible or not
    Attached(mpsc::Sender<Option<EventRecord>>),
    /// Read the observable state
    State(mpsc::Sender<MenuState>),
    Shutdown,
}

/// Handle for communicating with the context menu actor
#[derive(Clone)]
pub struct ContextMenuActorHandle {
    command_tx: mpsc::Sender<ContextMenuCommand>,
}

impl ContextMenuActorHandle {
    pub async fn open(&self, record: EventRecord, anchor: Anchor) -> AppResult<()> {
        self.command_tx
            .send(ContextMenuCommand::Open { record, anchor })
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))
    }

    pub async fn dismiss(&self) -> AppResult<()> {
        self.command_tx
            .send(ContextMenuCommand::Dismiss)
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))
    }

    /// Read the attached record regardless of visibility
    pub async fn attached(&self) -> AppResult<Option<EventRecord>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(ContextMenuCommand::Attached(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn state(&self) -> AppResult<MenuState> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(ContextMenuCommand::State(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(ContextMenuCommand::Shutdown).await;
        Ok(())
    }
}

impl ContextMenuActor {
    /// Create a new actor and return its handle
    pub fn new() -> (Self, ContextMenuActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            slot: MenuSlot::default(),
            command_rx,
        };

        let handle = ContextMenuActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Context menu actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                ContextMenuCommand::Open { record, anchor } => {
                    debug!(
                        "Attaching \"{}\" and showing menu at ({}, {})",
                        record.display_title(),
                        anchor.x,
                        anchor.y
                    );
                    // A new attach silently discards the previous record
                    self.slot.attached = Some(record);
                    self.slot.visible = true;
                    self.slot.anchor = anchor;
                }
                ContextMenuCommand::Dismiss => {
                    self.slot.visible = false;
                }
                ContextMenuCommand::Attached(response_tx) => {
                    let _ = response_tx.send(self.slot.attached.clone()).await;
                }
                ContextMenuCommand::State(response_tx) => {
                    let state = match (&self.slot.attached, self.slot.visible) {
                        (Some(record), true) => MenuState::Visible {
                            attached: record.clone(),
                            anchor: self.slot.anchor,
                        },
                        _ => MenuState::Hidden,
                    };
                    let _ = response_tx.send(state).await;
                }
                ContextMenuCommand::Shutdown => {
                    info!("Context menu actor shutting down");
                    break;
                }
            }
        }

        info!("Context menu actor shut down");
    }
}
