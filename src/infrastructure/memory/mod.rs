//! Host memory metrics for pressure-driven cache eviction.
//!
//! A [`MemoryGauge`] reads the process's resident memory; a [`MemoryBudget`]
//! compares growth over the startup baseline against the configured ceiling.

mod budget;
mod gauge;
mod process;

pub use budget::MemoryBudget;
pub use gauge::MemoryGauge;
pub use process::ProcessMemory;

#[cfg(test)]
pub use gauge::MockMemoryGauge;
