use crate::error::AppResult;
use crate::markup::{Document, NodeId};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

/// A pointer interaction over the rendered schedule.
///
/// Right-click and left-click are distinct channels, mirroring the DOM
/// `contextmenu` and `click` events they stand in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    ContextMenu { target: NodeId, x: i32, y: i32 },
    Click { target: NodeId, x: i32, y: i32 },
}

impl PointerEvent {
    /// The element the pointer was over
    pub fn target(&self) -> NodeId {
        match *self {
            PointerEvent::ContextMenu { target, .. } | PointerEvent::Click { target, .. } => target,
        }
    }
}

/// Receiver of pointer events, one per interactive component
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn handle(&self, doc: &Document, event: &PointerEvent) -> AppResult<()>;
}

/// Ordered fan-out of pointer events to registered sinks.
///
/// Dispatch is strictly sequential in registration order and each sink is
/// awaited before the next one runs. Handlers that must capture state
/// before a later transition invalidates it (the context menu's
/// read-attachment-then-hide rule) rely on this ordering.
#[derive(Clone, Default)]
pub struct EventBus {
    sinks: Arc<RwLock<Vec<(String, Arc<dyn EventSink>)>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink; sinks see events in registration order
    pub async fn subscribe(&self, name: &str, sink: Arc<dyn EventSink>) {
        self.sinks.write().await.push((name.to_string(), sink));
    }

    /// Number of registered sinks
    pub async fn sink_count(&self) -> usize {
        self.sinks.read().await.len()
    }

    /// Deliver one event to every sink.
    ///
    /// A sink error is logged and dispatch continues; one failed export
    /// attempt never takes the rest of the session down.
    pub async fn dispatch(&self, doc: &Document, event: &PointerEvent) {
        let sinks = self.sinks.read().await.clone();
        for (name, sink) in sinks {
            if let Err(e) = sink.handle(doc, event).await {
                error!("Error in event sink {}: {:?}", name, e);
            }
        }
    }
}
