//! Detail overlay: a read-only render of one entry's markup.
//!
//! Left-click on a schedule entry copies its rendered content into the
//! overlay and shows it; clicking the close button or exactly the overlay
//! backdrop hides it again. No export action originates here.

use crate::config::Config;
use crate::error::AppResult;
use crate::events::{EventBus, EventSink, PointerEvent};
use crate::markup::{Document, ENTRY_CLASS};
use crate::notify::NotifierHandle;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Element id of the overlay backdrop in the rendered chrome
pub const OVERLAY_ID: &str = "scheduleModal";

/// Class of the overlay's close button
pub const CLOSE_CLASS: &str = "close";

/// Observable state of the overlay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible {
        source_html: String,
    },
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        matches!(self, OverlayState::Visible { .. })
    }
}

/// Shared view of the overlay state machine
#[derive(Clone, Default)]
pub struct DetailOverlayHandle {
    state: Arc<RwLock<OverlayState>>,
}

impl DetailOverlayHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the observable overlay state
    pub async fn state(&self) -> OverlayState {
        self.state.read().await.clone()
    }

    async fn show(&self, source_html: String) {
        *self.state.write().await = OverlayState::Visible { source_html };
    }

    async fn hide(&self) {
        *self.state.write().await = OverlayState::Hidden;
    }
}

/// Detail overlay component
#[derive(Default)]
pub struct DetailOverlay {
    handle: RwLock<Option<DetailOverlayHandle>>,
}

impl DetailOverlay {
    /// Create a new detail overlay component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<DetailOverlayHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for DetailOverlay {
    fn name(&self) -> &'static str {
        "detail_overlay"
    }

    async fn init(
        &self,
        bus: &EventBus,
        _config: Arc<RwLock<Config>>,
        _notifier: NotifierHandle,
    ) -> AppResult<()> {
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(DetailOverlayHandle::new());
        }

        let sink = DetailOverlaySink {
            handle: handle_lock.as_ref().unwrap().clone(),
        };
        bus.subscribe(self.name(), Arc::new(sink)).await;

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

struct DetailOverlaySink {
    handle: DetailOverlayHandle,
}

#[async_trait]
impl EventSink for DetailOverlaySink {
    async fn handle(&self, doc: &Document, event: &PointerEvent) -> AppResult<()> {
        let target = match *event {
            // The overlay only listens on the left-click channel
            PointerEvent::ContextMenu { .. } => return Ok(()),
            PointerEvent::Click { target, .. } => target,
        };

        if let Some(entry) = doc.closest(target, ENTRY_CLASS) {
            debug!("Showing detail overlay for entry {}", entry);
            self.handle.show(doc.inner_html(entry)).await;
        } else if doc.closest(target, CLOSE_CLASS).is_some() {
            self.handle.hide().await;
        } else if doc.attr(target, "id") == Some(OVERLAY_ID) {
            // A click on exactly the backdrop closes; clicks on the
            // overlay content do not
            self.handle.hide().await;
        }

        Ok(())
    }
}
