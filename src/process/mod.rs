//! Process-related modules for enumeration, status parsing, and decoding.
//!
//! This module provides:
//! - `scanner`: process discovery and static identity reading
//! - `status`: key/value parsing of the status file
//! - `memory`: memory-size decoding and the usage report
//! - `state`: run-state decoding

pub mod memory;
pub mod scanner;
pub mod state;
pub mod status;

// Re-export commonly used types
pub use memory::{memory_usage, parse_memory_size, MemoryUsage};
pub use scanner::{clock_ticks_per_second, list_processes, list_processes_in, Process, PROC_ROOT};
pub use state::{run_state, StateReport};
pub use status::{fetch_status, read_status, StatusFn, StatusMap};
