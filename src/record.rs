use crate::markup::{Document, NodeId};

/// Calendar-event record extracted from one schedule-entry element.
///
/// Every field is carried verbatim from the markup: start/end timestamps
/// are opaque strings and are never parsed or validated here. Correctness
/// of their content is a contract owed by the schedule renderer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
pub struct EventRecord {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl EventRecord {
    /// Read the fixed attribute set off a schedule-entry element.
    ///
    /// Missing attributes degrade silently to `None`; there is no
    /// validation error at this layer. `data-description` and `data-date`
    /// are optional extras consumed only by the file-export path.
    pub fn from_element(doc: &Document, entry: NodeId) -> Self {
        let read = |name: &str| doc.attr(entry, name).map(str::to_string);

        Self {
            title: read("title"),
            start_time: read("data-start-datetime"),
            end_time: read("data-end-datetime"),
            description: read("data-description"),
            date: read("data-date"),
        }
    }

    /// Title for user-facing messages
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}
