//! Structured per-request access log.
//!
//! Distinct from the process diagnostics emitted through `log`/`env_logger`:
//! this is the client-facing audit trail written to `log/requests.txt` in
//! the exact record format below, not the operator-facing `RUST_LOG` stream.
//! The sink is guarded by its own mutex so concurrent workers can log
//! without tearing a line, matching a per-sink lock rather than one global
//! lock shared with request processing.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    /// `INFO` on success, `ERROR` for any 4xx/5xx.
    pub fn for_status(status: u16) -> Self {
        if status >= 400 {
            Level::Error
        } else {
            Level::Info
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

pub struct LogEntry<'a> {
    pub level: Level,
    pub status: u16,
    pub method: &'a str,
    pub uri_path: &'a [u8],
}

/// Thread-safe append-only writer for the access log file.
pub struct LoggerWriter {
    sink: Mutex<File>,
}

impl LoggerWriter {
    /// Opens (creating if necessary, including parent directories) the
    /// access log at `path` in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(LoggerWriter {
            sink: Mutex::new(file),
        })
    }

    /// Appends one record: `<datetime> [LEVEL] <status> <method> <uri-path>`.
    pub fn log(&self, entry: &LogEntry) {
        let path = decode_path_for_log(entry.uri_path);
        let line = format!(
            "{} [{}] {} {} {}\n",
            Local::now().format("%a %b %e %H:%M:%S %Y"),
            entry.level.as_str(),
            entry.status,
            entry.method,
            path,
        );

        // A write error here must not take down the worker; the access log
        // is best-effort with respect to the response already on the wire.
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(line.as_bytes());
        }
    }
}

/// Request paths are percent-decoded bytes and are not guaranteed to be
/// valid UTF-8; validate the fast path with `simdutf8` and fall back to a
/// lossy conversion rather than dropping the log line.
fn decode_path_for_log(path: &[u8]) -> std::borrow::Cow<'_, str> {
    match simdutf8::basic::from_utf8(path) {
        Ok(s) => std::borrow::Cow::Borrowed(s),
        Err(_) => String::from_utf8_lossy(path),
    }
}
