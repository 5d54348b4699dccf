use schedule_exporter::components::context_menu::{ContextMenu, ContextMenuHandle, MenuState};
use schedule_exporter::components::detail_overlay::DetailOverlay;
use schedule_exporter::components::ComponentManager;
use schedule_exporter::config::Config;
use schedule_exporter::events::EventBus;
use schedule_exporter::notify::{ConsoleNotifier, NotifierHandle};
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    let mut components = std::collections::HashMap::new();
    components.insert("context_menu".to_string(), true);
    components.insert("detail_overlay".to_string(), true);

    Config {
        sync_endpoint: "http://127.0.0.1:5000/update-google-event".to_string(),
        sync_timeout_secs: 10,
        export_dir: ".".to_string(),
        schedule_path: "schedule.html".to_string(),
        components,
    }
}

/// Smoke test to verify that the config holds its values
#[tokio::test]
async fn test_config_defaults() {
    let config = test_config();

    assert_eq!(
        config.sync_endpoint,
        "http://127.0.0.1:5000/update-google-event"
    );
    assert_eq!(config.sync_timeout_secs, 10);
    assert!(config.is_component_enabled("context_menu"));
    assert!(!config.is_component_enabled("no_such_component"));
    assert!(config.sync_endpoint_url().is_ok());
}

/// Smoke test for the context menu actor handle
#[tokio::test]
async fn test_menu_handle_creation() {
    let handle = ContextMenuHandle::new();

    assert_eq!(handle.state().await.unwrap(), MenuState::Hidden);
    assert_eq!(handle.attached().await.unwrap(), None);
    assert!(handle.shutdown().await.is_ok());
}

/// Components register their sinks on the bus in registration order
#[tokio::test]
async fn test_component_initialization_registers_sinks() {
    let config = Arc::new(RwLock::new(test_config()));
    let bus = EventBus::new();
    let notifier: NotifierHandle = Arc::new(ConsoleNotifier);

    let mut manager = ComponentManager::new(Arc::clone(&config));
    manager.register(ContextMenu::new());
    manager.register(DetailOverlay::new());

    manager
        .init_all(&bus, Arc::clone(&config), notifier)
        .await
        .unwrap();

    assert_eq!(bus.sink_count().await, 2);
    assert!(manager.get_component_by_name("context_menu").is_some());
    assert!(manager.get_component_by_name("detail_overlay").is_some());

    manager.shutdown_all().await.unwrap();
}

/// Disabled components stay off the bus
#[tokio::test]
async fn test_disabled_component_is_skipped() {
    let mut config = test_config();
    config
        .components
        .insert("detail_overlay".to_string(), false);
    let config = Arc::new(RwLock::new(config));

    let bus = EventBus::new();
    let notifier: NotifierHandle = Arc::new(ConsoleNotifier);

    let mut manager = ComponentManager::new(Arc::clone(&config));
    manager.register(ContextMenu::new());
    manager.register(DetailOverlay::new());

    manager
        .init_all(&bus, Arc::clone(&config), notifier)
        .await
        .unwrap();

    assert_eq!(bus.sink_count().await, 1);

    // The skipped component never built a handle
    let overlay = manager
        .get_component_by_name("detail_overlay")
        .and_then(|c| c.as_any().downcast_ref::<DetailOverlay>())
        .unwrap();
    assert!(overlay.get_handle().await.is_none());

    manager.shutdown_all().await.unwrap();
}
