//! Outbound HTTP probing.
//!
//! Provides an [`HttpProber`] trait with a production `reqwest`-backed
//! implementation. The trait is the seam that lets resolver tests script
//! whole redirect chains without touching the network.

mod prober;
mod reqwest_prober;

pub use prober::{HttpProber, ProbeError, ProbeResponse};
pub use reqwest_prober::ReqwestProber;

#[cfg(test)]
pub use prober::MockHttpProber;
