//! Error types for /proc reads and field decoding.

use std::path::PathBuf;

/// Errors surfaced by process enumeration, status fetching, and field decoding.
///
/// Reads of `/proc` entries can fail at any moment because the process behind
/// them exited; callers should treat `Io` as routine rather than exceptional.
#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    /// The process-information root or a per-process file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A memory size string was not two "NUMBER UNIT" tokens.
    #[error("memory size string {value:?} not of the expected 'NUMBER UNIT' form")]
    MalformedSize { value: String },

    /// A numeric token failed to parse as u64.
    #[error("invalid number {value:?} in {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A memory size in kB does not fit a u64 byte count.
    #[error("memory size string {value:?} overflows a u64 byte count")]
    SizeOverflow { value: String },

    /// The unit token of a memory size string was neither "kB" nor "B".
    #[error("unrecognized units: {units}")]
    UnrecognizedUnits { units: String },

    /// A field's raw value did not match its expected shape.
    #[error("'{field}' not in expected format: {value}")]
    MalformedField { field: &'static str, value: String },

    /// A mandatory field was absent from the status mapping.
    #[error("'{field}' not found in process status")]
    MissingField { field: &'static str },
}
