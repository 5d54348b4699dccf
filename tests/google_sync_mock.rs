use async_trait::async_trait;
use schedule_exporter::components::google_sync::{GoogleSyncHandle, SyncOutcome};
use schedule_exporter::config::Config;
use schedule_exporter::error::Error;
use schedule_exporter::events::PointerEvent;
use schedule_exporter::markup::{Document, ENTRY_CLASS};
use schedule_exporter::notify::{Notice, Notifier, NotifierHandle};
use schedule_exporter::record::EventRecord;
use schedule_exporter::startup::build_session;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_record() -> EventRecord {
    EventRecord {
        title: Some("Algorithms".to_string()),
        start_time: Some("2024-05-01T09:00".to_string()),
        end_time: Some("2024-05-01T10:30".to_string()),
        description: Some("not on the wire".to_string()),
        date: Some("2024-05-01".to_string()),
    }
}

fn config_for(endpoint: String) -> Arc<RwLock<Config>> {
    let mut config = Config::default();
    config.sync_endpoint = endpoint;
    Arc::new(RwLock::new(config))
}

#[tokio::test]
async fn success_status_yields_success_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update-google-event"))
        .and(body_json(serde_json::json!({
            "title": "Algorithms",
            "startTime": "2024-05-01T09:00",
            "endTime": "2024-05-01T10:30",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(format!("{}/update-google-event", server.uri()));
    let handle = GoogleSyncHandle::new(config, Duration::from_secs(5)).unwrap();

    let outcome = handle.push_event(test_record()).await.unwrap();
    assert_eq!(outcome, SyncOutcome::Success);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn error_status_passes_the_server_text_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update-google-event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "error": "quota exceeded",
        })))
        .mount(&server)
        .await;

    let config = config_for(format!("{}/update-google-event", server.uri()));
    let handle = GoogleSyncHandle::new(config, Duration::from_secs(5)).unwrap();

    let outcome = handle.push_event(test_record()).await.unwrap();
    assert_eq!(outcome, SyncOutcome::Rejected("quota exceeded".to_string()));
}

#[tokio::test]
async fn non_success_http_status_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = config_for(format!("{}/update-google-event", server.uri()));
    let handle = GoogleSyncHandle::new(config, Duration::from_secs(5)).unwrap();

    let err = handle.push_event(test_record()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn unparsable_body_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let config = config_for(format!("{}/update-google-event", server.uri()));
    let handle = GoogleSyncHandle::new(config, Duration::from_secs(5)).unwrap();

    let err = handle.push_event(test_record()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "success"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = config_for(format!("{}/update-google-event", server.uri()));
    let handle = GoogleSyncHandle::new(config, Duration::from_millis(200)).unwrap();

    let err = handle.push_event(test_record()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

// --- Full interaction path: google export ends in a user notification ---

const ONE_ENTRY: &str = concat!(
    "<div class=\"schedule-entry\" title=\"Algorithms\" ",
    "data-start-datetime=\"2024-05-01T09:00\" data-end-datetime=\"2024-05-01T10:30\">",
    "Algorithms</div>"
);

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

async fn run_google_export(endpoint: String) -> Vec<Notice> {
    let config = config_for(endpoint);
    let notifier = Arc::new(RecordingNotifier::default());
    let doc = Document::parse(ONE_ENTRY).unwrap();
    let session = build_session(doc, config, Arc::clone(&notifier) as NotifierHandle)
        .await
        .unwrap();

    let entry = session.doc.elements_by_class(ENTRY_CLASS)[0];
    session
        .bus
        .dispatch(
            &session.doc,
            &PointerEvent::ContextMenu {
                target: entry,
                x: 4,
                y: 4,
            },
        )
        .await;

    let google_item = session.doc.element_by_id("export-google").unwrap();
    session
        .bus
        .dispatch(
            &session.doc,
            &PointerEvent::Click {
                target: google_item,
                x: 4,
                y: 4,
            },
        )
        .await;

    session.components.shutdown_all().await.unwrap();
    let notices = notifier.notices.lock().unwrap().clone();
    notices
}

#[tokio::test]
async fn successful_sync_notifies_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update-google-event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notices = run_google_export(format!("{}/update-google-event", server.uri())).await;

    assert_eq!(
        notices,
        vec![Notice::SyncSucceeded {
            title: "Algorithms".to_string(),
        }]
    );
}

#[tokio::test]
async fn rejected_sync_notifies_failure_with_the_server_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "error": "quota exceeded",
        })))
        .mount(&server)
        .await;

    let notices = run_google_export(format!("{}/update-google-event", server.uri())).await;

    assert_eq!(notices.len(), 1);
    match &notices[0] {
        Notice::SyncFailed { title, reason } => {
            assert_eq!(title, "Algorithms");
            assert!(reason.contains("quota exceeded"));
        }
        other => panic!("expected a failure notice, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_endpoint_notifies_failure() {
    // Nothing listens here; the request fails at the transport level
    let notices = run_google_export("http://127.0.0.1:9/update-google-event".to_string()).await;

    assert_eq!(notices.len(), 1);
    assert!(matches!(notices[0], Notice::SyncFailed { .. }));
}
