//! Resident-memory gauge trait.

/// Reads the host process's resident memory.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::ProcessMemory`] - reads `/proc` on Linux
/// - `MockMemoryGauge` (tests) - fixed readings for eviction tests
#[cfg_attr(test, mockall::automock)]
pub trait MemoryGauge: Send + Sync {
    /// Current resident set size of this process, in bytes.
    ///
    /// Returns 0 when the figure cannot be read; callers treat that as
    /// "no pressure" rather than an error.
    fn resident_bytes(&self) -> u64;
}
