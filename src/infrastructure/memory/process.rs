//! Process memory readings from the host OS.

use super::gauge::MemoryGauge;

/// Memory gauge reading the current process's resident set size.
///
/// On Linux this parses `VmRSS` from `/proc/self/status`. On other platforms
/// the reading is 0, which disables memory-pressure eviction while leaving
/// age-based eviction intact.
#[derive(Debug, Default)]
pub struct ProcessMemory;

impl ProcessMemory {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryGauge for ProcessMemory {
    fn resident_bytes(&self) -> u64 {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/self/status")
                .ok()
                .and_then(|contents| parse_vm_rss_bytes(&contents))
                .unwrap_or(0)
        }
        #[cfg(not(target_os = "linux"))]
        {
            0
        }
    }
}

/// Extracts the `VmRSS` figure from `/proc/self/status` contents.
///
/// The kernel reports the value in kibibytes, e.g. `VmRSS:     1024 kB`.
#[cfg(target_os = "linux")]
fn parse_vm_rss_bytes(contents: &str) -> Option<u64> {
    let line = contents.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kib = line
        .split_whitespace()
        .nth(1)
        .and_then(|v| v.parse::<u64>().ok())?;
    Some(kib * 1024)
}
