mod actor;
mod handle;
pub mod models;

pub use handle::ContextMenuHandle;
pub use models::{Anchor, MenuAction, MenuState};

use crate::components::google_sync::{GoogleSyncHandle, SyncOutcome};
use crate::components::ics_export::{self, ExportTarget};
use crate::config::Config;
use crate::error::AppResult;
use crate::events::{EventBus, EventSink, PointerEvent};
use crate::markup::{Document, NodeId, ENTRY_CLASS};
use crate::notify::{Notice, NotifierHandle};
use crate::record::EventRecord;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, warn};

/// Context menu component: right-click attaches an entry record and shows
/// the menu, any left-click hides it, menu-item clicks export the
/// attached record
#[derive(Default)]
pub struct ContextMenu {
    handle: RwLock<Option<ContextMenuHandle>>,
    sync_handle: RwLock<Option<GoogleSyncHandle>>,
}

impl ContextMenu {
    /// Create a new context menu component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
            sync_handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<ContextMenuHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for ContextMenu {
    fn name(&self) -> &'static str {
        "context_menu"
    }

    async fn init(
        &self,
        bus: &EventBus,
        config: Arc<RwLock<Config>>,
        notifier: NotifierHandle,
    ) -> AppResult<()> {
        let timeout = {
            let config_read = config.read().await;
            Duration::from_secs(config_read.sync_timeout_secs)
        };

        // Create the handles if they don't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(ContextMenuHandle::new());
        }
        let mut sync_lock = self.sync_handle.write().await;
        if sync_lock.is_none() {
            *sync_lock = Some(GoogleSyncHandle::new(Arc::clone(&config), timeout)?);
        }

        let sink = ContextMenuSink {
            menu: handle_lock.as_ref().unwrap().clone(),
            sync: sync_lock.as_ref().unwrap().clone(),
            notifier,
            config,
        };
        bus.subscribe(self.name(), Arc::new(sink)).await;

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        let sync_lock = self.sync_handle.read().await;
        if let Some(sync) = &*sync_lock {
            sync.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Event sink driving the menu state machine and its export actions
struct ContextMenuSink {
    menu: ContextMenuHandle,
    sync: GoogleSyncHandle,
    notifier: NotifierHandle,
    config: Arc<RwLock<Config>>,
}

impl ContextMenuSink {
    /// Which menu item, if any, a click target sits inside
    fn classify_action(doc: &Document, target: NodeId) -> Option<MenuAction> {
        for action in [MenuAction::ExportOutlook, MenuAction::ExportGoogle] {
            let hit = doc
                .closest_by(target, |d, n| d.attr(n, "id") == Some(action.element_id()))
                .is_some();
            if hit {
                return Some(action);
            }
        }
        None
    }

    async fn run_action(&self, action: MenuAction, record: EventRecord) -> AppResult<()> {
        match action {
            MenuAction::ExportOutlook => {
                let export_dir = {
                    let config_read = self.config.read().await;
                    PathBuf::from(config_read.export_dir.clone())
                };
                let path = ics_export::save(&export_dir, ExportTarget::Outlook, &record).await?;
                self.notifier
                    .notify(Notice::FileSaved {
                        path: path.display().to_string(),
                    })
                    .await;
            }
            MenuAction::ExportGoogle => {
                let title = record.display_title().to_string();
                match self.sync.push_event(record).await {
                    Ok(SyncOutcome::Success) => {
                        self.notifier.notify(Notice::SyncSucceeded { title }).await;
                    }
                    Ok(SyncOutcome::Rejected(reason)) => {
                        self.notifier
                            .notify(Notice::SyncFailed { title, reason })
                            .await;
                    }
                    Err(e) => {
                        // Network failures surface to the user exactly like
                        // a server rejection
                        error!("Sync request failed: {:?}", e);
                        self.notifier
                            .notify(Notice::SyncFailed {
                                title,
                                reason: e.to_string(),
                            })
                            .await;
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for ContextMenuSink {
    async fn handle(&self, doc: &Document, event: &PointerEvent) -> AppResult<()> {
        match *event {
            PointerEvent::ContextMenu { target, x, y } => {
                match doc.closest(target, ENTRY_CLASS) {
                    Some(entry) => {
                        let record = EventRecord::from_element(doc, entry);
                        self.menu.open(record, Anchor { x, y }).await?;
                    }
                    None => {
                        self.menu.dismiss().await?;
                    }
                }
            }
            PointerEvent::Click { target, .. } => {
                // Capture first, hide second, act last: the attached record
                // is read within the same dispatch that hides the menu.
                let action = Self::classify_action(doc, target);
                let captured = match action {
                    Some(_) => self.menu.attached().await?,
                    None => None,
                };

                self.menu.dismiss().await?;

                if let Some(action) = action {
                    match captured {
                        Some(record) => self.run_action(action, record).await?,
                        // A menu action with no attachment ever set is an
                        // explicit no-op
                        None => warn!("Menu action {:?} with no attached entry", action),
                    }
                }
            }
        }
        Ok(())
    }
}
