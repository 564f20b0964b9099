//! Run-state decoding for the /proc status `State` field.
//!
//! The kernel reports a process's state as a single character code followed
//! by a parenthesized description, e.g. `"S (sleeping)"`. Codes in current
//! and historical kernels include:
//!
//! - `R` running
//! - `S` sleeping in an interruptible wait
//! - `D` waiting in uninterruptible disk sleep
//! - `Z` zombie
//! - `T` stopped on a signal (or, before Linux 2.6.33, trace stopped)
//! - `t` tracing stop (Linux 2.6.33 onward)
//! - `W` paging (before Linux 2.6.0) or waking (2.6.33 to 3.13)
//! - `X` dead (Linux 2.6.0 onward)
//! - `x` dead (Linux 2.6.33 to 3.13 only)
//! - `K` wakekill (Linux 2.6.33 to 3.13 only)
//! - `P` parked (Linux 3.9 to 3.13 only)
//!
//! The code is passed through verbatim and never validated against this
//! table, so new kernel codes flow through unchanged.

use serde::Serialize;

use crate::error::ProcError;
use crate::process::scanner::{proc_dir, Process};
use crate::process::status::{read_status, StatusMap};

/// A process's run state: the raw code character plus its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    /// State code, a single letter by kernel convention.
    pub code: String,
    /// Short description, e.g. "sleeping", with enclosing parentheses removed.
    pub description: String,
}

/// Decodes a raw `State` value like `"S (sleeping)"`.
///
/// The value must be exactly two whitespace-separated tokens; any whitespace
/// run (spaces or a tab) works as the separator. The description keeps its
/// text with enclosing parenthesis characters trimmed; parentheses are
/// optional, so `"S sleeping"` decodes too. `"S(sleeping)"` has no separator
/// and is a format error.
fn parse_state(state_str: &str) -> Result<StateReport, ProcError> {
    let fields: Vec<&str> = state_str.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(ProcError::MalformedField {
            field: "State",
            value: state_str.to_string(),
        });
    }

    Ok(StateReport {
        code: fields[0].to_string(),
        description: fields[1].trim_matches(|c| c == '(' || c == ')').to_string(),
    })
}

fn state_from_status(status: &StatusMap) -> Result<StateReport, ProcError> {
    let raw = status
        .get("State")
        .ok_or(ProcError::MissingField { field: "State" })?;
    parse_state(raw)
}

/// Fetches the current run state for a PID under the fixed `/proc` root.
///
/// Unlike the memory fields, `State` is mandatory: a status text without it
/// is a [`ProcError::MissingField`] error, never a default value.
pub fn run_state(pid: u32) -> Result<StateReport, ProcError> {
    let status = read_status(&proc_dir(pid))?;
    state_from_status(&status)
}

impl Process {
    /// Returns this process's current run state via its status fetcher.
    pub fn run_state(&self) -> Result<StateReport, ProcError> {
        let status = (self.status)(&self.proc_path)?;
        state_from_status(&status)
    }
}
