//! Progress messages for the command line.
//!
//! Entries are printed to stdout for the user and mirrored as `tracing`
//! events so they show up next to the stage diagnostics.

use serde::{Deserialize, Serialize};

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Indentation level (for detail lines under a step)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Text as printed on the console.
    pub fn render(&self) -> String {
        format!("{}{}", "    ".repeat(self.indent as usize), self.message)
    }
}

/// Print an entry and forward it to `tracing`.
pub fn log(entry: LogEntry) {
    match entry.level {
        LogLevel::Info | LogLevel::Success => tracing::debug!(message = %entry.message, "progress"),
        LogLevel::Warning => tracing::warn!(message = %entry.message, "progress"),
        LogLevel::Error => tracing::error!(message = %entry.message, "progress"),
    }

    match entry.level {
        LogLevel::Error => eprintln!("{}", entry.render()),
        _ => println!("{}", entry.render()),
    }
}

/// Report a failure on stderr.
pub fn log_error(msg: impl Into<String>) {
    log(LogEntry::error(msg));
}
