//! # Link Module
//!
//! The write-only serial link to the blaster rig.
//!
//! - [`port`]: device selection and the blocking [`SerialLink`] writer
//! - [`watch`]: background watcher reporting device removal
//! - [`transcript`]: optional append-only record of sent lines

pub mod port;
pub mod transcript;
pub mod watch;

pub use port::{SerialLink, select_port};
pub use transcript::Transcript;
pub use watch::{LinkEvent, spawn_watcher};

use crate::error::Result;

/// Outbound side of a serial link.
#[cfg_attr(test, mockall::automock)]
pub trait LinkWriter {
    /// Whether a device is open. Writes to a closed link are skipped by callers.
    fn is_open(&self) -> bool;

    /// Writes `line` and waits for the OS to drain it to the device.
    ///
    /// Only the write is bounded by a timeout. The drain has no timeout of its
    /// own and finishes in about one line time because flow control is off.
    fn write_line(&mut self, line: &[u8]) -> Result<()>;
}
