//! Process-wide audit logger.
//!
//! The interpreter and the image loader report through here, so installing
//! one logger in the binary turns auditing on for every machine in the
//! process. Until then every call is a no-op.

use std::io;
use std::sync::OnceLock;

use crate::core::IntcodeError;

use super::entry::AuditEntry;
use super::logger::{AuditConfig, AuditLogger};

static GLOBAL_LOGGER: OnceLock<AuditLogger> = OnceLock::new();

/// Install the global audit logger. Fails if one is already installed.
pub fn init_global_logger(config: AuditConfig) -> io::Result<()> {
    let logger = AuditLogger::new(config)?;
    GLOBAL_LOGGER.set(logger).map_err(|_| {
        io::Error::new(io::ErrorKind::AlreadyExists, "audit logger already installed")
    })
}

/// Install a stdout-only global logger unless one is already installed.
pub fn init_stdout_logger() {
    let _ = GLOBAL_LOGGER.set(AuditLogger::stdout_only());
}

pub fn global_logger() -> Option<&'static AuditLogger> {
    GLOBAL_LOGGER.get()
}

/// Whether a global logger is installed.
///
/// Callers check this before building entries they would otherwise throw away.
pub fn is_enabled() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Record an entry. Write errors are dropped: auditing never fails a run.
pub fn audit(entry: AuditEntry) {
    if let Some(logger) = global_logger() {
        let _ = logger.log(entry);
    }
}

/// Record a failed operation. See [`AuditEntry::with_failure`].
pub fn audit_failure(entry: AuditEntry, err: &IntcodeError) {
    if is_enabled() {
        audit(entry.with_failure(err));
    }
}
