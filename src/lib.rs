//! Process information reader for the Linux /proc filesystem.
//!
//! This library enumerates running processes and reports their static
//! identity (PID, command, arguments, start time) and dynamic attributes
//! (memory usage, run state) by parsing the kernel's textual process files.
//!
//! Nothing is cached: every query re-reads /proc, so results are never stale
//! but any call can fail because the process exited in the meantime. Callers
//! wanting retry-on-exit-race semantics loop themselves.
//!
//! # Usage
//!
//! ```rust,no_run
//! use procview::list_processes;
//!
//! let procs = list_processes()?;
//! for p in &procs {
//!     println!("{} {} started at tick {}", p.pid, p.command, p.start_time);
//!
//!     // Dynamic data is read fresh per call and may fail if the
//!     // process has exited.
//!     if let Ok(mem) = p.memory_usage() {
//!         println!("  rss: {} bytes", mem.rss_bytes);
//!     }
//!     if let Ok(state) = p.run_state() {
//!         println!("  state: {} ({})", state.code, state.description);
//!     }
//! }
//! # Ok::<(), procview::ProcError>(())
//! ```

pub mod error;
pub mod process;

// Re-export main types for convenience
pub use error::ProcError;
pub use process::{
    clock_ticks_per_second, fetch_status, list_processes, list_processes_in, memory_usage,
    parse_memory_size, run_state, MemoryUsage, Process, StateReport, StatusFn, StatusMap,
};
