//! Structured Logging with Sensitive Data Redaction
//!
//! Safe logging for a credential layer: values whose keys look like key
//! material or secrets are fully redacted, addresses and tokens are
//! partially redacted. Debug-level entries are dropped unless explicitly
//! enabled.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag to enable/disable debug logging
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_debug() {
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

pub fn disable_debug() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::SeqCst)
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field (auto-redacts when the key looks sensitive)
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value_str = value.to_string();
        let redacted = redact_if_sensitive(key, &value_str);
        self.fields.push((key, redacted));
        self
    }

    /// Add a field with forced full redaction
    pub fn redacted_field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, redact_value(&value.to_string())));
        self
    }

    /// Emit the entry
    pub fn log(self) {
        if self.level == LogLevel::Debug && !is_debug_enabled() {
            return;
        }

        let fields_str = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");

        if fields_str.is_empty() {
            eprintln!("[{}] {} [{}] {}", timestamp, self.level, self.module, self.message);
        } else {
            eprintln!(
                "[{}] {} [{}] {} | {}",
                timestamp, self.level, self.module, self.message, fields_str
            );
        }
    }
}

/// Redact a value if the key suggests it's sensitive
fn redact_if_sensitive(key: &str, value: &str) -> String {
    let key_lower = key.to_lowercase();

    let fully_redacted_keys = [
        "private_key",
        "privatekey",
        "secret",
        "signing_key",
        "password",
        "mac",
    ];
    for sensitive_key in &fully_redacted_keys {
        if key_lower.contains(sensitive_key) {
            return redact_value(value);
        }
    }

    let partial_keys = ["address", "recipient", "sender", "from", "to", "token", "signer"];
    for partial_key in &partial_keys {
        if key_lower.contains(partial_key) {
            return redact_partial(value);
        }
    }

    value.to_string()
}

/// Fully redact a sensitive value
pub fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }
    if value.len() <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", value.len())
    }
}

/// Partially redact an identifier (first 6/8 and last 4 chars)
pub fn redact_partial(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }
    if trimmed.len() <= 12 {
        return redact_value(trimmed);
    }

    let prefix_len = if trimmed.starts_with("0x") { 8 } else { 6 };
    let prefix = &trimmed[..prefix_len];
    let suffix = &trimmed[trimmed.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

/// Shorthand constructors
pub fn info(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Info, module, message)
}

pub fn warn(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Warn, module, message)
}

pub fn debug(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Debug, module, message)
}

pub fn error(module: &'static str, message: impl Into<String>) -> LogEntry {
    LogEntry::new(LogLevel::Error, module, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_keys_fully_redacted() {
        let redacted = redact_if_sensitive("private_key", "ac0974bec39a17e36ba4");
        assert!(redacted.starts_with("[REDACTED"));
        assert!(!redacted.contains("ac0974"));
    }

    #[test]
    fn test_address_keys_partially_redacted() {
        let redacted = redact_if_sensitive(
            "recipient_address",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        );
        assert_eq!(redacted, "0xf39Fd6...2266");
    }

    #[test]
    fn test_short_values_hidden_entirely() {
        assert_eq!(redact_partial("short"), "[REDACTED:5chars]");
        assert_eq!(redact_value("ab"), "[REDACTED]");
        assert_eq!(redact_value(""), "[EMPTY]");
    }

    #[test]
    fn test_non_sensitive_keys_pass_through() {
        assert_eq!(redact_if_sensitive("chain", "ethereum"), "ethereum");
        assert_eq!(redact_if_sensitive("count", "3"), "3");
    }
}
