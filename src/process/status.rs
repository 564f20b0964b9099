//! Status file parsing for reading process attributes from /proc.
//!
//! This module turns the colon-delimited text of `/proc/<pid>/status` into a
//! map from attribute name to raw value string. The map is rebuilt from the
//! file on every call so callers never see stale data.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::ProcError;
use crate::process::scanner::proc_dir;

/// Parsed key/value view of one process's status text.
///
/// Keys are unique; a later duplicate line overwrites an earlier one. The
/// kernel's field set varies by version and process type, so every lookup
/// must be treated as optional.
pub type StatusMap = HashMap<String, String>;

/// Status fetch strategy carried by a [`Process`](crate::Process) for its
/// dynamic queries. Defaults to [`read_status`]; tests substitute fixture
/// fetchers.
pub type StatusFn = fn(&Path) -> Result<StatusMap, ProcError>;

/// Reads and parses `status` from a process directory.
///
/// Fails only if the file cannot be read (the process exited, or the PID was
/// never valid). Lines that do not split on ":" into exactly two pieces are
/// dropped, which tolerates trailers and malformed lines; a value containing
/// a colon of its own is discarded rather than misparsed.
pub fn read_status(proc_path: &Path) -> Result<StatusMap, ProcError> {
    let status_path = proc_path.join("status");
    let content = fs::read_to_string(&status_path).map_err(|e| {
        debug!(
            "failed to read {} (process might have exited): {}",
            status_path.display(),
            e
        );
        ProcError::Io {
            path: status_path.clone(),
            source: e,
        }
    })?;

    let mut status = StatusMap::new();
    for line in content.trim().lines() {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 2 {
            continue;
        }
        status.insert(fields[0].trim().to_string(), fields[1].trim().to_string());
    }

    Ok(status)
}

/// Fetches the status mapping for a PID under the fixed `/proc` root.
///
/// The PID does not need to come from a prior enumeration.
pub fn fetch_status(pid: u32) -> Result<StatusMap, ProcError> {
    read_status(&proc_dir(pid))
}
