//! Check modules for checkssl
//!
//! The tolerance classifier, the connection probe and the pieces the probe
//! is built from.

pub mod certificate;
pub mod dns;
pub mod probe;
pub mod tolerance;
pub mod verifier;

pub use probe::{Endpoint, HeadResponse, Probe, ProbeSession};
pub use tolerance::classify;
