//! Memory usage decoding for the size-bearing /proc status fields.
//!
//! This module interprets the "NUMBER UNIT" strings the kernel emits for
//! `VmSize`, `VmRSS`, and `HugetlbPages` and assembles them into a byte-count
//! report. The report is rebuilt from a fresh status read on every call.

use serde::Serialize;
use tracing::warn;

use crate::error::ProcError;
use crate::process::scanner::{proc_dir, Process};
use crate::process::status::{read_status, StatusMap};

/// A process's current memory usage in bytes.
///
/// Each field independently falls back to zero when its source field is
/// absent from the status text or malformed; a bad field never poisons the
/// other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemoryUsage {
    /// Total allocated virtual memory (RAM, swap, mappings) from `VmSize`.
    pub vm_size_bytes: u64,
    /// Memory currently resident in RAM from `VmRSS`.
    pub rss_bytes: u64,
    /// Memory in huge pages from `HugetlbPages`.
    pub huge_bytes: u64,
}

/// Decodes a status memory string like `"1353584 kB"` into bytes.
///
/// The string must be exactly two whitespace-separated tokens: a decimal
/// unsigned integer and a unit, where `"kB"` multiplies by 1024 and `"B"` is
/// taken as-is. Anything else is an error.
pub fn parse_memory_size(mem_str: &str) -> Result<u64, ProcError> {
    let fields: Vec<&str> = mem_str.split_whitespace().collect();

    if fields.len() != 2 {
        return Err(ProcError::MalformedSize {
            value: mem_str.to_string(),
        });
    }

    let size_num: u64 = fields[0].parse().map_err(|e| ProcError::InvalidNumber {
        field: "memory size",
        value: fields[0].to_string(),
        source: e,
    })?;

    match fields[1] {
        "kB" => size_num.checked_mul(1024).ok_or_else(|| ProcError::SizeOverflow {
            value: mem_str.to_string(),
        }),
        "B" => Ok(size_num),
        other => Err(ProcError::UnrecognizedUnits {
            units: other.to_string(),
        }),
    }
}

/// Decodes one size-bearing field from the status map, zero on absence or
/// malformed text.
fn decode_size_field(status: &StatusMap, field: &str, who: &str) -> u64 {
    let Some(raw) = status.get(field) else {
        return 0;
    };
    match parse_memory_size(raw) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("failed to parse {} for {}: {:?} ({})", field, who, raw, e);
            0
        }
    }
}

fn report_from_status(status: &StatusMap, who: &str) -> MemoryUsage {
    MemoryUsage {
        vm_size_bytes: decode_size_field(status, "VmSize", who),
        rss_bytes: decode_size_field(status, "VmRSS", who),
        huge_bytes: decode_size_field(status, "HugetlbPages", who),
    }
}

/// Fetches the current memory usage for a PID under the fixed `/proc` root.
///
/// Fails only if the status read itself fails; missing or malformed memory
/// fields are reported as zero.
pub fn memory_usage(pid: u32) -> Result<MemoryUsage, ProcError> {
    let status = read_status(&proc_dir(pid))?;
    Ok(report_from_status(&status, &pid.to_string()))
}

impl Process {
    /// Returns this process's current memory usage via its status fetcher.
    ///
    /// Re-reads the source on every call; two immediate calls against an
    /// unchanged process yield identical reports.
    pub fn memory_usage(&self) -> Result<MemoryUsage, ProcError> {
        let status = (self.status)(&self.proc_path)?;
        Ok(report_from_status(&status, &self.command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::status::StatusFn;
    use std::path::{Path, PathBuf};

    fn mock_process(status: StatusFn) -> Process {
        Process {
            pid: 26690,
            command: "bessd".to_string(),
            args: Vec::new(),
            start_time: 1000,
            proc_path: PathBuf::from("/proc/26690"),
            status,
        }
    }

    fn entries(pairs: &[(&str, &str)]) -> StatusMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn status_good(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[
            ("Name", "bessd"),
            ("State", "S (sleeping)"),
            ("VmSize", "1353584 kB"),
            ("VmRSS", "54584 kB"),
            ("HugetlbPages", "1048576 kB"),
            ("Threads", "3"),
        ]))
    }

    fn status_units_bytes(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[
            ("VmSize", "72332 B"),
            ("VmRSS", "11552 B"),
            ("HugetlbPages", "0 B"),
        ]))
    }

    fn status_missing_huge(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[("VmSize", "72332 kB"), ("VmRSS", "11552 kB")]))
    }

    fn status_mixed_units(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[
            ("VmSize", "72332 kB"),
            ("VmRSS", "11552 B"),
            ("HugetlbPages", "123 MB"),
        ]))
    }

    fn status_overflowing_vm_size(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[
            ("VmSize", "18014398509481984 kB"),
            ("VmRSS", "11552 kB"),
            ("HugetlbPages", "0 kB"),
        ]))
    }

    fn status_malformed(_: &Path) -> Result<StatusMap, ProcError> {
        Ok(entries(&[
            ("VmSize", "123 456"),
            ("VmRSS", "xyz kB"),
            ("HugetlbPages", "0kB"),
        ]))
    }

    fn status_unavailable(path: &Path) -> Result<StatusMap, ProcError> {
        Err(ProcError::Io {
            path: path.join("status"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }

    // -------------------------------------------------------------------------
    // Tests for parse_memory_size
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_memory_size_kb_and_bytes() {
        assert_eq!(parse_memory_size("1 kB").expect("should parse"), 1024);
        assert_eq!(parse_memory_size("1 B").expect("should parse"), 1);
        assert_eq!(parse_memory_size(" 1 kB ").expect("should parse"), 1024);
        assert_eq!(parse_memory_size("1353584 kB").expect("should parse"), 1386070016);
        assert_eq!(parse_memory_size("0 kB").expect("should parse"), 0);
        // Any whitespace run separates the tokens.
        assert_eq!(parse_memory_size("1\tkB").expect("should parse"), 1024);
    }

    #[test]
    fn test_parse_memory_size_wrong_token_count() {
        for input in ["", "123 ", "0kB", "VmSize:  1353584 kB", "1 kB extra"] {
            assert!(
                matches!(parse_memory_size(input), Err(ProcError::MalformedSize { .. })),
                "expected MalformedSize for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_memory_size_bad_number() {
        assert!(matches!(parse_memory_size("xyz kB"), Err(ProcError::InvalidNumber { .. })));
        assert!(matches!(parse_memory_size("-1 kB"), Err(ProcError::InvalidNumber { .. })));
        assert!(matches!(parse_memory_size("1.5 kB"), Err(ProcError::InvalidNumber { .. })));
    }

    #[test]
    fn test_parse_memory_size_unrecognized_units() {
        match parse_memory_size("123 MB") {
            Err(ProcError::UnrecognizedUnits { units }) => assert_eq!(units, "MB"),
            other => panic!("expected UnrecognizedUnits, got {:?}", other),
        }
        assert!(matches!(parse_memory_size("1 xyz"), Err(ProcError::UnrecognizedUnits { .. })));
    }

    #[test]
    fn test_parse_memory_size_kb_overflow() {
        // Largest count that still fits a u64 once multiplied by 1024.
        assert_eq!(
            parse_memory_size("18014398509481983 kB").expect("should parse"),
            18014398509481983 * 1024
        );
        match parse_memory_size("18014398509481984 kB") {
            Err(ProcError::SizeOverflow { value }) => {
                assert_eq!(value, "18014398509481984 kB");
            }
            other => panic!("expected SizeOverflow, got {:?}", other),
        }
        assert!(matches!(
            parse_memory_size("18446744073709551615 kB"),
            Err(ProcError::SizeOverflow { .. })
        ));
        // Byte units never multiply, so u64::MAX stays valid.
        assert_eq!(
            parse_memory_size("18446744073709551615 B").expect("should parse"),
            u64::MAX
        );
    }

    #[test]
    fn test_parse_memory_size_deterministic() {
        for _ in 0..3 {
            assert_eq!(parse_memory_size("42 kB").expect("should parse"), 43008);
            assert!(matches!(parse_memory_size("42 MB"), Err(ProcError::UnrecognizedUnits { .. })));
        }
    }

    // -------------------------------------------------------------------------
    // Tests for Process::memory_usage
    // -------------------------------------------------------------------------

    #[test]
    fn test_memory_usage_all_fields_present() {
        let usage = mock_process(status_good).memory_usage().expect("should succeed");
        assert_eq!(usage.vm_size_bytes, 1353584 * 1024);
        assert_eq!(usage.rss_bytes, 54584 * 1024);
        assert_eq!(usage.huge_bytes, 1048576 * 1024);
    }

    #[test]
    fn test_memory_usage_byte_units() {
        let usage = mock_process(status_units_bytes).memory_usage().expect("should succeed");
        assert_eq!(usage.vm_size_bytes, 72332);
        assert_eq!(usage.rss_bytes, 11552);
        assert_eq!(usage.huge_bytes, 0);
    }

    #[test]
    fn test_memory_usage_missing_huge_is_zero() {
        let usage = mock_process(status_missing_huge).memory_usage().expect("should succeed");
        assert_eq!(usage.vm_size_bytes, 72332 * 1024);
        assert_eq!(usage.rss_bytes, 11552 * 1024);
        assert_eq!(usage.huge_bytes, 0);
    }

    #[test]
    fn test_memory_usage_fields_decode_independently() {
        // Bad huge units must not affect the well-formed fields.
        let usage = mock_process(status_mixed_units).memory_usage().expect("should succeed");
        assert_eq!(usage.vm_size_bytes, 72332 * 1024);
        assert_eq!(usage.rss_bytes, 11552);
        assert_eq!(usage.huge_bytes, 0);
    }

    #[test]
    fn test_memory_usage_overflowing_field_is_zero() {
        // An overflowing kB count zero-substitutes like any other malformed
        // field instead of failing (or wrapping) the report.
        let usage = mock_process(status_overflowing_vm_size)
            .memory_usage()
            .expect("should succeed");
        assert_eq!(usage.vm_size_bytes, 0);
        assert_eq!(usage.rss_bytes, 11552 * 1024);
        assert_eq!(usage.huge_bytes, 0);
    }

    #[test]
    fn test_memory_usage_malformed_fields_are_zero() {
        let usage = mock_process(status_malformed).memory_usage().expect("should succeed");
        assert_eq!(usage, MemoryUsage::default());
    }

    #[test]
    fn test_memory_usage_status_failure_propagates() {
        let result = mock_process(status_unavailable).memory_usage();
        assert!(matches!(result, Err(ProcError::Io { .. })));
    }

    #[test]
    fn test_memory_usage_idempotent() {
        let p = mock_process(status_good);
        let first = p.memory_usage().expect("should succeed");
        let second = p.memory_usage().expect("should succeed");
        assert_eq!(first, second);
    }
}
