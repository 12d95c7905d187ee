//! Attest Infrastructure - concrete transport adapters
//!
//! Implements the engine's [`attest_engine::HttpTransport`] port with
//! reqwest.

pub mod adapters;

pub use adapters::ReqwestTransport;
