use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

/// Label set attached to a stream. Ordered so payloads serialize deterministically.
pub type Labels = BTreeMap<String, String>;

pub const LEVEL_LABEL: &str = "level";
pub const APP_LABEL: &str = "app";
pub const ENVIRONMENT_LABEL: &str = "environment";

/// Severity tag of a log entry. Levels are only ever attached as a label, never filtered on.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Level {
    #[default]
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} is not a valid log level", self.0)
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "debug" => Ok(Level::Debug),
            invalid => Err(ParseLevelError(invalid.to_owned())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-supplied key-value metadata, merged into the labels of an entry.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Metadata(Labels);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn into_labels(self) -> Labels {
        self.0
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Metadata(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A single log line, ready to be shipped or printed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LogEntry {
    pub message: String,
    pub level: Level,
    /// Fixed labels with caller metadata on top. Always carries a `level` label.
    pub labels: Labels,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
}

impl LogEntry {
    /// Merge `metadata` over `fixed_labels` and resolve the level.
    ///
    /// A `level` key in `metadata` overrides `default_level` and is rewritten in its canonical
    /// form. Strings that are not a known level are kept verbatim as the label, while the entry
    /// falls back to `default_level`.
    pub fn new(
        message: String,
        default_level: Level,
        fixed_labels: &Labels,
        metadata: Metadata,
        timestamp: i64,
    ) -> Self {
        let mut labels = fixed_labels.clone();
        labels.extend(metadata.into_labels());

        let level = match labels.get(LEVEL_LABEL).map(|level| level.parse::<Level>()) {
            Some(Err(_)) => default_level,
            Some(Ok(level)) => {
                labels.insert(LEVEL_LABEL.to_owned(), level.to_string());
                level
            }
            None => {
                labels.insert(LEVEL_LABEL.to_owned(), default_level.to_string());
                default_level
            }
        };

        Self {
            message,
            level,
            labels,
            timestamp,
        }
    }
}

/// Nanosecond wall clock that never goes backwards.
///
/// Wall time only has millisecond resolution here. Readings are clamped to the highest
/// value handed out so far, so sequential entries always carry non-decreasing timestamps.
#[derive(Debug, Default)]
pub struct NanoClock {
    high_water_mark: AtomicI64,
}

impl NanoClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> i64 {
        self.observe(chrono::Utc::now().timestamp_millis() * 1_000_000)
    }

    fn observe(&self, candidate: i64) -> i64 {
        let previous = self
            .high_water_mark
            .fetch_max(candidate, Ordering::Relaxed);

        std::cmp::max(previous, candidate)
    }
}
