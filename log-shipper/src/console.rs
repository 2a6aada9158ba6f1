//! Local console output, used in development and whenever delivery fails.
//!
//! The console is whatever `tracing` subscriber the host installed.
use tracing::{debug, error, info, warn};

use crate::entry::{Level, LogEntry, LEVEL_LABEL};
use crate::error::DeliveryError;

pub const CONSOLE_TARGET: &str = "log_shipper::console";

/// Filter for hosts without `RUST_LOG`: console lines pass at every level, so `debug` entries
/// are never dropped on the floor.
pub const DEFAULT_FILTER: &str = "info,log_shipper::console=trace";

/// Write an entry at its own level as `[level] message`, with its labels attached.
pub fn print(entry: &LogEntry) {
    let level = entry.labels.get(LEVEL_LABEL).map_or(entry.level.as_str(), String::as_str);
    let labels = &entry.labels;

    match entry.level {
        Level::Info => info!(target: CONSOLE_TARGET, ?labels, "[{}] {}", level, entry.message),
        Level::Warn => warn!(target: CONSOLE_TARGET, ?labels, "[{}] {}", level, entry.message),
        Level::Error => error!(target: CONSOLE_TARGET, ?labels, "[{}] {}", level, entry.message),
        Level::Debug => debug!(target: CONSOLE_TARGET, ?labels, "[{}] {}", level, entry.message),
    }
}

/// Report a failed delivery, then fall back to printing the entry.
pub fn delivery_failed(error: &DeliveryError, entry: &LogEntry) {
    error!(target: CONSOLE_TARGET, "failed to send logs to Grafana: {}", error);

    metrics::counter!("log_shipper_entries_total", "outcome" => "failed").increment(1);

    print(entry);
}

/// `log` was called where no async runtime is available to send from.
pub fn no_runtime(entry: &LogEntry) {
    error!(
        target: CONSOLE_TARGET,
        "failed to send logs to Grafana: no async runtime available"
    );

    metrics::counter!("log_shipper_entries_total", "outcome" => "failed").increment(1);

    print(entry);
}
