use crate::record::EventRecord;
use serde::{Deserialize, Serialize};

/// Wire request for the collaborator sync endpoint.
///
/// Only title and the two timestamps cross the wire; description and date
/// belong to the file-export path and are never sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&EventRecord> for SyncRequest {
    fn from(record: &EventRecord) -> Self {
        Self {
            title: record.title.clone().unwrap_or_default(),
            start_time: record.start_time.clone().unwrap_or_default(),
            end_time: record.end_time.clone().unwrap_or_default(),
        }
    }
}

/// Wire response from the sync endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of one sync attempt, consumed only by a user-facing
/// notification and never retained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success,
    Rejected(String),
}

impl SyncResponse {
    /// Map the server's status field onto an outcome; anything other than
    /// the literal "success" is a rejection carrying the server text
    pub fn into_outcome(self) -> SyncOutcome {
        if self.status == "success" {
            SyncOutcome::Success
        } else {
            SyncOutcome::Rejected(
                self.error
                    .unwrap_or_else(|| format!("server returned status \"{}\"", self.status)),
            )
        }
    }
}
