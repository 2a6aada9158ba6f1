//! Wire format accepted by the Loki push API.
use serde::Serialize;

use crate::entry::{Labels, LogEntry};

/// Body of a `POST /loki/api/v1/push` request.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct PushPayload {
    pub streams: Vec<Stream>,
}

/// A label set paired with an ordered sequence of `(nanosecond timestamp, line)` values.
/// Loki expects both halves of a value as strings.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct Stream {
    pub stream: Labels,
    pub values: Vec<(String, String)>,
}

impl From<&LogEntry> for PushPayload {
    fn from(entry: &LogEntry) -> Self {
        PushPayload {
            streams: vec![Stream {
                stream: entry.labels.clone(),
                values: vec![(entry.timestamp.to_string(), entry.message.clone())],
            }],
        }
    }
}
