//! Process scanning utilities for discovering process entries in /proc.
//!
//! This module provides functions to scan the /proc filesystem for process
//! entries and read the static identity of each one: PID, command name,
//! command line arguments, and start time.

use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ProcError;
use crate::process::status::{read_status, StatusFn};

/// Default process-information root.
pub const PROC_ROOT: &str = "/proc";

/// Start time is field 22 of /proc/<pid>/stat, index 21 (0-based). The stat
/// format is positional, so the field is never searched for by name.
const START_TIME_FIELD: usize = 21;

/// One enumerated process with its static identity.
///
/// Dynamic information, like memory usage or run state, is read from /proc
/// every time it is needed to avoid worrying about stale data. The identity
/// fields are fixed at enumeration time and never re-validated: the process
/// behind this record may exit at any moment, so every later query can fail
/// with [`ProcError::Io`].
#[derive(Debug, Clone)]
pub struct Process {
    /// Process ID.
    pub pid: u32,
    /// Command name, truncated by the kernel to its fixed comm buffer.
    pub command: String,
    /// Command line arguments, in order. A process with an empty command
    /// line (typically a kernel thread) yields a single empty string.
    pub args: Vec<String>,
    /// Start time in clock ticks since system boot.
    pub start_time: u64,

    pub(crate) proc_path: PathBuf,
    pub(crate) status: StatusFn,
}

fn query_clock_tick() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as u64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100
}

static CLK_TCK: Lazy<u64> = Lazy::new(query_clock_tick);

/// System clock ticks per second (usually 100, but can vary).
///
/// Divides [`Process::start_time`] ticks into seconds since boot; conversion
/// to wall-clock time additionally needs the boot time and is left to the
/// caller.
pub fn clock_ticks_per_second() -> u64 {
    *CLK_TCK
}

/// Path of the per-process directory for a PID under the fixed /proc root.
pub(crate) fn proc_dir(pid: u32) -> PathBuf {
    Path::new(PROC_ROOT).join(pid.to_string())
}

/// Lists all processes under the fixed `/proc` root.
pub fn list_processes() -> Result<Vec<Process>, ProcError> {
    list_processes_in(Path::new(PROC_ROOT))
}

/// Lists all processes under an arbitrary process-information root.
///
/// Entries that fail any per-process read are dropped rather than failing
/// the whole scan: a process exiting between the directory listing and the
/// file reads is routine. The result is unordered and may be incomplete
/// relative to the true live set. Only an unreadable root is an error.
pub fn list_processes_in(root: &Path) -> Result<Vec<Process>, ProcError> {
    let entries = fs::read_dir(root).map_err(|e| ProcError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut procs = Vec::with_capacity(50);
    for entry in entries.flatten() {
        // Ignore anything that's not a directory.
        match entry.file_type() {
            Ok(t) if t.is_dir() => {}
            _ => continue,
        }

        let p = entry.path();
        let name = match p.file_name().and_then(|s| s.to_str()) {
            Some(v) => v,
            None => continue,
        };

        // Only digit-prefixed names are processes; the rest are other
        // kernel entries like "self" or "net".
        if !name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }

        let pid: u32 = match name.parse() {
            Ok(v) => v,
            Err(e) => {
                debug!("failed to parse {:?} as a PID: {}", name, e);
                continue;
            }
        };
        // PIDs are positive; "0" parses but names no process.
        if pid == 0 {
            debug!("ignoring entry {:?}: PID must be positive", name);
            continue;
        }

        let command = match read_command(&p) {
            Ok(v) => v,
            Err(e) => {
                debug!("failed to read comm for pid {} (process might have exited): {}", pid, e);
                continue;
            }
        };

        let args = match read_args(&p) {
            Ok(v) => v,
            Err(e) => {
                debug!("failed to read cmdline for pid {} (process might have exited): {}", pid, e);
                continue;
            }
        };

        let start_time = match read_start_time(&p) {
            Ok(v) => v,
            Err(e) => {
                debug!("failed to read start time for pid {}: {}", pid, e);
                continue;
            }
        };

        procs.push(Process {
            pid,
            command,
            args,
            start_time,
            proc_path: p,
            status: read_status,
        });
    }

    Ok(procs)
}

/// Reads the command name from the comm file.
fn read_command(proc_path: &Path) -> Result<String, ProcError> {
    let comm_path = proc_path.join("comm");
    let content = fs::read_to_string(&comm_path).map_err(|e| ProcError::Io {
        path: comm_path.clone(),
        source: e,
    })?;
    Ok(content.trim().to_string())
}

/// Reads the command line and splits it on NUL into argument tokens.
///
/// The conventional trailing NUL does not produce a trailing empty argument,
/// but an empty cmdline file yields a single empty string.
fn read_args(proc_path: &Path) -> Result<Vec<String>, ProcError> {
    let cmdline_path = proc_path.join("cmdline");
    let content = fs::read(&cmdline_path).map_err(|e| ProcError::Io {
        path: cmdline_path.clone(),
        source: e,
    })?;

    let text = String::from_utf8_lossy(&content);
    let mut args: Vec<String> = text.trim().split('\0').map(str::to_string).collect();
    if args.len() > 1 && args.last().is_some_and(String::is_empty) {
        args.pop();
    }
    Ok(args)
}

/// Reads the start time (clock ticks since boot) from the stat file.
fn read_start_time(proc_path: &Path) -> Result<u64, ProcError> {
    let stat_path = proc_path.join("stat");
    let content = fs::read_to_string(&stat_path).map_err(|e| ProcError::Io {
        path: stat_path.clone(),
        source: e,
    })?;

    let parts: Vec<&str> = content.split_whitespace().collect();
    let raw = parts
        .get(START_TIME_FIELD)
        .ok_or_else(|| ProcError::MalformedField {
            field: "starttime",
            value: content.trim().to_string(),
        })?;

    raw.parse().map_err(|e| ProcError::InvalidNumber {
        field: "starttime",
        value: (*raw).to_string(),
        source: e,
    })
}
