//! Audit logger implementation.
//!
//! Thread-safe: interpreters running on different threads may share one
//! logger. Entries below the configured severity are dropped before
//! formatting.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::entry::{AuditEntry, Severity};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the audit logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Append entries to this file (`None` = no file).
    pub log_path: Option<PathBuf>,
    /// Minimum severity to log.
    pub min_severity: Severity,
    /// Also print each entry to stdout.
    pub echo_stdout: bool,
    pub format: AuditFormat,
}

/// Output format for audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditFormat {
    /// Structured text lines prefixed with a sequence number.
    #[default]
    Text,
    /// One JSON object per line.
    JsonLines,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            min_severity: Severity::Info,
            echo_stdout: false,
            format: AuditFormat::Text,
        }
    }
}

impl AuditConfig {
    /// Log to a file only.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Log to stdout only.
    pub fn stdout() -> Self {
        Self {
            echo_stdout: true,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: AuditFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }
}

// =============================================================================
// Audit Logger
// =============================================================================

/// Thread-safe audit logger with optional file persistence.
pub struct AuditLogger {
    config: AuditConfig,
    writer: Mutex<Option<BufWriter<File>>>,
    sequence: AtomicU64,
}

impl AuditLogger {
    /// Create a logger, opening the log file in append mode if one is configured.
    pub fn new(config: AuditConfig) -> io::Result<Self> {
        let writer = match &config.log_path {
            Some(path) => Some(BufWriter::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
            None => None,
        };

        Ok(Self {
            config,
            writer: Mutex::new(writer),
            sequence: AtomicU64::new(0),
        })
    }

    /// Create a logger that writes to the specified path.
    pub fn with_path(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(AuditConfig::file(path.as_ref()))
    }

    /// Create a logger that only echoes to stdout.
    pub fn stdout_only() -> Self {
        Self {
            config: AuditConfig::stdout(),
            writer: Mutex::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    /// Render an entry as one output line (newline included).
    fn render(&self, seq: u64, entry: &AuditEntry) -> io::Result<String> {
        match self.config.format {
            AuditFormat::Text => Ok(format!("{:08} | {}\n", seq, entry.format_line())),
            AuditFormat::JsonLines => entry
                .to_json()
                .map(|json| format!("{}\n", json))
                .map_err(io::Error::from),
        }
    }

    /// Log an audit entry.
    pub fn log(&self, entry: AuditEntry) -> io::Result<()> {
        if entry.severity < self.config.min_severity {
            return Ok(());
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let line = self.render(seq, &entry)?;

        if let Ok(mut guard) = self.writer.lock() {
            if let Some(ref mut w) = *guard {
                w.write_all(line.as_bytes())?;
                w.flush()?;
            }
        }

        if self.config.echo_stdout {
            print!("{}", line);
        }

        Ok(())
    }

    /// Flush the file buffer.
    pub fn flush(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.writer.lock() {
            if let Some(ref mut w) = *guard {
                w.flush()?;
            }
        }
        Ok(())
    }

    /// Number of entries written so far.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("config", &self.config)
            .field("sequence", &self.sequence())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
