//! Structured audit logging.
//!
//! Every entry records an action, the entity it touched, a description,
//! a severity and an outcome, plus free-form metadata. Output is either
//! sequence-numbered text lines or JSON Lines.
//!
//! The interpreter reports halts and failed steps through the global logger.
//! Nothing is recorded until a global logger is installed, so library users
//! who never call [`init_global_logger`] pay nothing.
//!
//! # Modules
//!
//! - `entry`: entry types (AuditEntry, Severity, Outcome, ActionCategory)
//! - `logger`: thread-safe file/stdout logger and its configuration
//! - `global`: process-wide singleton
//!
//! # Example
//!
//! ```no_run
//! use intcode::audit::{AuditConfig, AuditEntry, AuditFormat, AuditLogger, Outcome};
//!
//! let config = AuditConfig::file("intcode-audit.log").with_format(AuditFormat::JsonLines);
//! let logger = AuditLogger::new(config)?;
//! logger.log(
//!     AuditEntry::new("LOAD", "Image", "day9.txt", "Loaded 973 words")
//!         .with_outcome(Outcome::Success),
//! )?;
//! # Ok::<(), std::io::Error>(())
//! ```

mod entry;
mod global;
mod logger;

pub use entry::{ActionCategory, AuditEntry, Outcome, Severity};

pub use logger::{AuditConfig, AuditFormat, AuditLogger};

pub use global::{
    audit, audit_failure, global_logger, init_global_logger, init_stdout_logger, is_enabled,
};

// =============================================================================
// Macros
// =============================================================================

/// Log an entry with structured fields to the global logger.
///
/// # Example
///
/// ```
/// intcode::audit_log!(
///     action = "LOAD",
///     entity = ("Image", "day2.txt"),
///     description = "Loaded 153 words",
///     category = Load,
///     outcome = Success,
///     meta = { words = 153, source = "file" },
/// );
/// ```
#[macro_export]
macro_rules! audit_log {
    (
        action = $action:expr,
        entity = ($etype:expr, $eid:expr),
        description = $desc:expr
        $(, category = $cat:ident)?
        $(, severity = $sev:ident)?
        $(, outcome = $out:ident)?
        $(, duration_us = $dur:expr)?
        $(, meta = { $($key:ident = $val:expr),* $(,)? })?
        $(,)?
    ) => {{
        if $crate::audit::is_enabled() {
            #[allow(unused_mut)]
            let mut entry = $crate::audit::AuditEntry::new($action, $etype, $eid, $desc);
            $(entry = entry.with_category($crate::audit::ActionCategory::$cat);)?
            $(entry = entry.with_severity($crate::audit::Severity::$sev);)?
            $(entry = entry.with_outcome($crate::audit::Outcome::$out);)?
            $(entry = entry.with_duration_us($dur);)?
            $($(entry = entry.with_meta(stringify!($key), $val.to_string());)*)?
            $crate::audit::audit(entry);
        }
    }};
}
