//! Process-wide accessor for hosts that want a single shared shipper.
//!
//! Installing is optional: a `LogShipper` works just as well passed around explicitly.
use once_cell::sync::OnceCell;

use crate::error::AlreadyInstalled;
use crate::shipper::LogShipper;

static GLOBAL: OnceCell<LogShipper> = OnceCell::new();

/// Attach `shipper` as the global logger. Can only succeed once per process.
pub fn install(shipper: LogShipper) -> Result<&'static LogShipper, AlreadyInstalled> {
    GLOBAL.set(shipper).map_err(|_| AlreadyInstalled)?;

    GLOBAL.get().ok_or(AlreadyInstalled)
}

/// The installed shipper, if any.
pub fn global() -> Option<&'static LogShipper> {
    GLOBAL.get()
}
