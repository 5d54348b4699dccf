use async_trait::async_trait;
use schedule_exporter::components::context_menu::{ContextMenu, ContextMenuHandle, MenuState};
use schedule_exporter::components::detail_overlay::{DetailOverlay, DetailOverlayHandle};
use schedule_exporter::config::Config;
use schedule_exporter::events::PointerEvent;
use schedule_exporter::markup::{Document, NodeId, ENTRY_CLASS};
use schedule_exporter::notify::{Notice, Notifier, NotifierHandle};
use schedule_exporter::startup::{build_session, Session};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

const SCHEDULE_FIXTURE: &str = concat!(
    "<div class=\"schedule-grid\">",
    "<div class=\"schedule-entry\" title=\"Algorithms\" ",
    "data-start-datetime=\"2024-05-01T09:00\" data-end-datetime=\"2024-05-01T10:30\">",
    "<span class=\"subject\">Algorithms</span></div>",
    "<div class=\"schedule-entry\" title=\"Anatomy\" ",
    "data-start-datetime=\"2024-05-01T11:00\" data-end-datetime=\"2024-05-01T12:30\">",
    "<span class=\"subject\">Anatomy</span></div>",
    "</div>"
);

/// Notifier that records every notice for later assertions
#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    fn take(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

struct Fixture {
    session: Session,
    notifier: Arc<RecordingNotifier>,
    _export_dir: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let export_dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.export_dir = export_dir.path().display().to_string();
    let config = Arc::new(RwLock::new(config));

    let notifier = Arc::new(RecordingNotifier::default());
    let doc = Document::parse(SCHEDULE_FIXTURE).unwrap();
    let session = build_session(doc, config, Arc::clone(&notifier) as NotifierHandle)
        .await
        .unwrap();

    Fixture {
        session,
        notifier,
        _export_dir: export_dir,
    }
}

fn entry(session: &Session, index: usize) -> NodeId {
    session.doc.elements_by_class(ENTRY_CLASS)[index]
}

async fn menu_handle_of(session: &Session) -> ContextMenuHandle {
    let menu = session
        .components
        .get_component_by_name("context_menu")
        .and_then(|c| c.as_any().downcast_ref::<ContextMenu>())
        .expect("context menu component");
    menu.get_handle().await.expect("context menu handle")
}

async fn overlay_handle_of(session: &Session) -> DetailOverlayHandle {
    let overlay = session
        .components
        .get_component_by_name("detail_overlay")
        .and_then(|c| c.as_any().downcast_ref::<DetailOverlay>())
        .expect("detail overlay component");
    overlay.get_handle().await.expect("detail overlay handle")
}

async fn right_click(session: &Session, target: NodeId, x: i32, y: i32) {
    session
        .bus
        .dispatch(&session.doc, &PointerEvent::ContextMenu { target, x, y })
        .await;
}

async fn left_click(session: &Session, target: NodeId) {
    session
        .bus
        .dispatch(&session.doc, &PointerEvent::Click { target, x: 0, y: 0 })
        .await;
}

#[tokio::test]
async fn right_click_on_entry_attaches_and_shows_menu() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;

    right_click(&f.session, entry(&f.session, 0), 120, 80).await;

    match menu.state().await.unwrap() {
        MenuState::Visible { attached, anchor } => {
            assert_eq!(attached.title.as_deref(), Some("Algorithms"));
            assert_eq!(attached.start_time.as_deref(), Some("2024-05-01T09:00"));
            assert_eq!((anchor.x, anchor.y), (120, 80));
        }
        MenuState::Hidden => panic!("menu should be visible after entry right-click"),
    }
}

#[tokio::test]
async fn right_click_on_nested_child_resolves_the_entry() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;
    let span = f.session.doc.elements_by_class("subject")[1];

    right_click(&f.session, span, 5, 5).await;

    let attached = menu.attached().await.unwrap().unwrap();
    assert_eq!(attached.title.as_deref(), Some("Anatomy"));
}

#[tokio::test]
async fn right_click_outside_entries_hides_the_menu() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;

    right_click(&f.session, entry(&f.session, 0), 1, 1).await;
    right_click(&f.session, f.session.doc.root(), 2, 2).await;

    assert_eq!(menu.state().await.unwrap(), MenuState::Hidden);
}

#[tokio::test]
async fn any_left_click_hides_the_menu() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;

    right_click(&f.session, entry(&f.session, 0), 1, 1).await;
    assert!(menu.state().await.unwrap().is_visible());

    left_click(&f.session, f.session.doc.root()).await;
    assert_eq!(menu.state().await.unwrap(), MenuState::Hidden);
}

#[tokio::test]
async fn outlook_export_writes_the_ics_file_and_hides_the_menu() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;

    right_click(&f.session, entry(&f.session, 0), 10, 20).await;
    let outlook_item = f.session.doc.element_by_id("export-outlook").unwrap();
    left_click(&f.session, outlook_item).await;

    // The same click both acted and hid the menu
    assert_eq!(menu.state().await.unwrap(), MenuState::Hidden);

    let path = f._export_dir.path().join("outlook-event.ics");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("SUMMARY:Algorithms"));
    assert!(content.contains("DTSTART:2024-05-01T09:0000"));
    assert!(content.contains("DTEND:2024-05-01T10:3000"));
    assert_eq!(content.matches("BEGIN:VEVENT").count(), 1);

    let notices = f.notifier.take();
    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::FileSaved { .. }));
}

#[tokio::test]
async fn exporting_twice_yields_identical_bytes() {
    let f = fixture().await;
    let outlook_item = f.session.doc.element_by_id("export-outlook").unwrap();
    let path = f._export_dir.path().join("outlook-event.ics");

    right_click(&f.session, entry(&f.session, 0), 0, 0).await;
    left_click(&f.session, outlook_item).await;
    let first = std::fs::read(&path).unwrap();

    right_click(&f.session, entry(&f.session, 0), 0, 0).await;
    left_click(&f.session, outlook_item).await;
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn menu_action_without_attachment_is_a_no_op() {
    let f = fixture().await;
    let outlook_item = f.session.doc.element_by_id("export-outlook").unwrap();

    // No right-click ever happened
    left_click(&f.session, outlook_item).await;

    assert!(!f._export_dir.path().join("outlook-event.ics").exists());
    assert!(f.notifier.take().is_empty());
}

#[tokio::test]
async fn overlay_and_menu_states_are_independent() {
    let f = fixture().await;
    let menu = menu_handle_of(&f.session).await;
    let overlay = overlay_handle_of(&f.session).await;

    // Left-click the first entry: overlay shows its markup
    left_click(&f.session, entry(&f.session, 0)).await;
    match overlay.state().await {
        schedule_exporter::components::detail_overlay::OverlayState::Visible { source_html } => {
            assert!(source_html.contains("Algorithms"));
        }
        _ => panic!("overlay should be visible after entry left-click"),
    }

    // Right-click a different entry: the menu opens with the second record,
    // the overlay stays put
    right_click(&f.session, entry(&f.session, 1), 7, 9).await;
    match menu.state().await.unwrap() {
        MenuState::Visible { attached, .. } => {
            assert_eq!(attached.title.as_deref(), Some("Anatomy"));
        }
        MenuState::Hidden => panic!("menu should be visible"),
    }
    assert!(overlay.state().await.is_visible());

    // The close button only affects the overlay
    let close = f.session.doc.elements_by_class("close")[0];
    left_click(&f.session, close).await;
    assert!(!overlay.state().await.is_visible());
}
