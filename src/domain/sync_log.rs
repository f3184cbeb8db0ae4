use crate::framework::{FieldMapping, RecordKind};
use chrono::{Local, NaiveDateTime};

/// Cell format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line appended to the "sync log" worksheet.
///
/// Push-only: the kind declares no identity field, so every persist creates a
/// new row and no lookup is ever made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLog {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

impl SyncLog {
    /// A log line stamped with the local time.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(message, Local::now().naive_local())
    }

    pub fn at(message: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

impl RecordKind for SyncLog {
    fn collection_name(&self) -> &str {
        "sync log"
    }

    fn identity_field(&self) -> Option<&str> {
        None
    }

    fn field_mapping(&self) -> FieldMapping {
        vec![
            (
                "timestamp".to_string(),
                self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ),
            ("message".to_string(), self.message.clone()),
        ]
    }
}
