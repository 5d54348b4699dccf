use async_trait::async_trait;
use std::sync::Arc;

/// A user-facing outcome of an export attempt.
///
/// The success/failure distinction is the contract; wording is
/// presentational and may change freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SyncSucceeded { title: String },
    SyncFailed { title: String, reason: String },
    FileSaved { path: String },
}

/// Sink for user-facing notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);
}

/// Shared handle to whatever notifier the session runs with
pub type NotifierHandle = Arc<dyn Notifier>;

/// Console notifier, the headless stand-in for a blocking dialog
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, notice: Notice) {
        match notice {
            Notice::SyncSucceeded { title } => {
                println!("The event \"{}\" was added to Google Calendar.", title);
            }
            Notice::SyncFailed { title, reason } => {
                println!(
                    "Adding the event \"{}\" to Google Calendar failed: {}",
                    title, reason
                );
            }
            Notice::FileSaved { path } => {
                println!("Calendar file saved to {}", path);
            }
        }
    }
}
