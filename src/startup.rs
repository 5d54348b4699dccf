use crate::chrome::ensure_chrome;
use crate::components::context_menu::ContextMenu;
use crate::components::detail_overlay::DetailOverlay;
use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::Error;
use crate::events::{EventBus, PointerEvent};
use crate::markup::{Document, ENTRY_CLASS};
use crate::notify::{ConsoleNotifier, NotifierHandle};
use crate::shutdown;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// A wired interaction session: the loaded document, the event bus with
/// every enabled component subscribed, and the component manager
pub struct Session {
    pub doc: Document,
    pub bus: EventBus,
    pub components: Arc<ComponentManager>,
}

/// Wire the components onto a bus over the given document.
///
/// Registration order matters: the context menu subscribes before the
/// overlay, so menu action capture always runs ahead of the overlay's
/// reaction to the same click.
pub async fn build_session(
    mut doc: Document,
    config: Arc<RwLock<Config>>,
    notifier: NotifierHandle,
) -> miette::Result<Session> {
    ensure_chrome(&mut doc);

    let bus = EventBus::new();

    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(ContextMenu::new());
    component_manager.register(DetailOverlay::new());

    let components = Arc::new(component_manager);
    components
        .init_all(&bus, Arc::clone(&config), notifier)
        .await?;

    Ok(Session {
        doc,
        bus,
        components,
    })
}

/// Load the rendered schedule fragment named by the config.
///
/// A missing file is not fatal: the session starts over an empty grid so
/// the chrome and controllers still come up.
pub async fn load_document(config: &Arc<RwLock<Config>>) -> miette::Result<Document> {
    let path = {
        let config_read = config.read().await;
        config_read.schedule_path.clone()
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let doc = Document::parse(&content)?;
            info!(
                "Loaded schedule from {} ({} entries)",
                path,
                doc.elements_by_class(ENTRY_CLASS).len()
            );
            Ok(doc)
        }
        Err(e) => {
            warn!("Could not read schedule file {}: {}, starting empty", path, e);
            Ok(Document::new())
        }
    }
}

/// Initialize and run the interactive session until EOF, `quit` or a
/// termination signal
pub async fn start_session(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let doc = load_document(&config).await?;
    let notifier: NotifierHandle = Arc::new(ConsoleNotifier);
    let session = build_session(doc, Arc::clone(&config), notifier).await?;

    // Create shutdown channel
    let (shutdown_send, mut shutdown_recv) = oneshot::channel();

    // Clone component manager for the signal handler
    let shutdown_components = Arc::clone(&session.components);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components).await;
    });

    info!("Session ready; commands: open <n> | menu <n> <x> <y> | click | outlook | google | close | state | quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.map_err(Error::from)? {
                    Some(line) => {
                        if !run_command(&session, line.trim()).await? {
                            break;
                        }
                    }
                    // EOF behaves like quit
                    None => break,
                }
            }
            _ = &mut shutdown_recv => {
                info!("Received shutdown signal, ending session");
                return Ok(());
            }
        }
    }

    session.components.shutdown_all().await?;
    Ok(())
}

/// Execute one driver command; returns false when the session should end
async fn run_command(session: &Session, line: &str) -> miette::Result<bool> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let event = match parts.as_slice() {
        [] => return Ok(true),
        ["quit"] | ["exit"] => return Ok(false),
        ["state"] => {
            log_states(session).await;
            return Ok(true);
        }
        ["open", n] => entry_target(session, n).map(|target| PointerEvent::Click {
            target,
            x: 0,
            y: 0,
        }),
        ["menu", n, x, y] => {
            let anchor = (x.parse::<i32>().ok(), y.parse::<i32>().ok());
            match (entry_target(session, n), anchor) {
                (Some(target), (Some(x), Some(y))) => {
                    Some(PointerEvent::ContextMenu { target, x, y })
                }
                _ => None,
            }
        }
        ["click"] => Some(PointerEvent::Click {
            target: session.doc.root(),
            x: 0,
            y: 0,
        }),
        ["outlook"] => chrome_target(session, "export-outlook"),
        ["google"] => chrome_target(session, "export-google"),
        ["close"] => session
            .doc
            .elements_by_class("close")
            .first()
            .map(|&target| PointerEvent::Click { target, x: 0, y: 0 }),
        _ => None,
    };

    match event {
        Some(event) => session.bus.dispatch(&session.doc, &event).await,
        None => warn!("Unrecognized command: {}", line),
    }

    Ok(true)
}

/// Resolve a 1-based entry index from the driver input
fn entry_target(session: &Session, index: &str) -> Option<crate::markup::NodeId> {
    let index = index.parse::<usize>().ok()?.checked_sub(1)?;
    session
        .doc
        .elements_by_class(ENTRY_CLASS)
        .get(index)
        .copied()
}

fn chrome_target(session: &Session, id: &str) -> Option<PointerEvent> {
    session
        .doc
        .element_by_id(id)
        .map(|target| PointerEvent::Click { target, x: 0, y: 0 })
}

/// Log the observable controller states, for interactive inspection
async fn log_states(session: &Session) {
    if let Some(menu) = session
        .components
        .get_component_by_name("context_menu")
        .and_then(|c| c.as_any().downcast_ref::<ContextMenu>())
    {
        if let Some(handle) = menu.get_handle().await {
            match handle.state().await {
                Ok(state) => info!("Context menu: {:?}", state),
                Err(e) => error!("Could not read menu state: {:?}", e),
            }
        }
    }

    if let Some(overlay) = session
        .components
        .get_component_by_name("detail_overlay")
        .and_then(|c| c.as_any().downcast_ref::<DetailOverlay>())
    {
        if let Some(handle) = overlay.get_handle().await {
            info!("Detail overlay: {:?}", handle.state().await);
        }
    }
}
