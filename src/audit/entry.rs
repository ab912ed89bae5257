//! Audit entry types.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::core::IntcodeError;

// =============================================================================
// Core Types
// =============================================================================

/// Severity level for audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    /// Normal operation.
    Info = 0,
    /// Potential issue; the operation continued or the caller can recover.
    Warning = 1,
    /// The operation failed.
    Error = 2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of audited action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    /// Reading and parsing program images.
    Load,
    /// Instruction execution.
    Execute,
    /// Program input and output.
    Io,
    /// Configuration changes.
    Config,
    /// Process-level events.
    System,
    Custom(String),
}

impl ActionCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ActionCategory::Load => "LOAD",
            ActionCategory::Execute => "EXECUTE",
            ActionCategory::Io => "IO",
            ActionCategory::Config => "CONFIG",
            ActionCategory::System => "SYSTEM",
            ActionCategory::Custom(s) => s,
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audit Entry
// =============================================================================

/// An immutable audit log entry.
///
/// Records which action happened to which entity, when, and how it ended.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Process-unique identifier.
    pub id: u64,
    /// UTC timestamp (milliseconds since the Unix epoch).
    pub timestamp_ms: u64,
    /// Action performed (e.g. "LOAD", "HALT", "STEP").
    pub action: String,
    pub category: ActionCategory,
    /// Type of entity involved (e.g. "Image", "Interpreter").
    pub entity_type: String,
    /// Identifier of the entity (file name, interpreter label).
    pub entity_id: String,
    pub description: String,
    pub severity: Severity,
    pub outcome: Outcome,
    /// Duration in microseconds, if measured.
    pub duration_us: Option<u64>,
    /// Additional structured data, ordered by key.
    pub metadata: BTreeMap<String, String>,
}

/// Wire shape of an entry in JSON Lines output.
#[derive(Serialize)]
struct JsonEntry<'a> {
    id: u64,
    timestamp: String,
    severity: &'static str,
    category: &'a str,
    action: &'a str,
    entity_type: &'a str,
    entity_id: &'a str,
    outcome: &'static str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_us: Option<u64>,
    #[serde(skip_serializing_if = "no_metadata")]
    metadata: &'a BTreeMap<String, String>,
}

fn no_metadata(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

impl AuditEntry {
    /// Create a new entry with the required fields.
    ///
    /// Defaults: category `System`, severity `Info`, outcome `Success`.
    pub fn new(
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            id: COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            timestamp_ms,
            action: action.into(),
            category: ActionCategory::System,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            description: description.into(),
            severity: Severity::Info,
            outcome: Outcome::Success,
            duration_us: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: ActionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_duration_us(mut self, us: u64) -> Self {
        self.duration_us = Some(us);
        self
    }

    /// Add a metadata key-value pair.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Mark the entry as a failure caused by `err`.
    ///
    /// Caller errors (empty input, an exhausted step budget) become warnings,
    /// everything else an error. The error's code and category go into the
    /// metadata.
    pub fn with_failure(self, err: &IntcodeError) -> Self {
        let severity = if err.is_caller_error() { Severity::Warning } else { Severity::Error };
        self.with_severity(severity)
            .with_outcome(Outcome::Failure)
            .with_meta("code", err.code().to_string())
            .with_meta("category", err.category().to_string())
    }

    /// Format the timestamp as ISO 8601 UTC.
    pub fn timestamp_iso(&self) -> String {
        let secs = self.timestamp_ms / 1000;
        let ms = self.timestamp_ms % 1000;
        let (year, month, day) = civil_from_days((secs / 86_400) as i64);
        let time = secs % 86_400;

        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            year,
            month,
            day,
            time / 3600,
            (time % 3600) / 60,
            time % 60,
            ms
        )
    }

    /// Format as a single structured text line.
    ///
    /// Format: `TIMESTAMP | SEVERITY | CATEGORY | ACTION | ENTITY | OUTCOME | DESCRIPTION [metadata]`
    pub fn format_line(&self) -> String {
        let mut line = format!(
            "{} | {:5} | {:8} | {:6} | {}:{} | {:7} | {}",
            self.timestamp_iso(),
            self.severity.as_str(),
            self.category.as_str(),
            self.action,
            self.entity_type,
            self.entity_id,
            self.outcome.as_str(),
            self.description,
        );

        if let Some(us) = self.duration_us {
            if us >= 1_000_000 {
                line.push_str(&format!(" [{:.2}s]", us as f64 / 1_000_000.0));
            } else if us >= 1_000 {
                line.push_str(&format!(" [{:.2}ms]", us as f64 / 1_000.0));
            } else {
                line.push_str(&format!(" [{}us]", us));
            }
        }

        if !self.metadata.is_empty() {
            let meta: Vec<String> = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            line.push_str(&format!(" {{{}}}", meta.join(", ")));
        }

        line
    }

    /// Serialize to a single JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&JsonEntry {
            id: self.id,
            timestamp: self.timestamp_iso(),
            severity: self.severity.as_str(),
            category: self.category.as_str(),
            action: &self.action,
            entity_type: &self.entity_type,
            entity_id: &self.entity_id,
            outcome: self.outcome.as_str(),
            description: &self.description,
            duration_us: self.duration_us,
            metadata: &self.metadata,
        })
    }
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

// =============================================================================
// Tests
// =============================================================================
