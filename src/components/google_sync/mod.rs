mod actor;
mod handle;
pub mod models;

pub use handle::GoogleSyncHandle;
pub use models::{SyncOutcome, SyncRequest, SyncResponse};
