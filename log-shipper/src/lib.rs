pub mod config;
pub mod console;
pub mod entry;
pub mod error;
pub mod payload;
pub mod plugin;
pub mod shipper;

pub use entry::{Labels, Level, LogEntry, Metadata};
pub use shipper::LogShipper;
