//! Client for the hosted database's REST and remote-procedure surfaces.
//!
//! Don't hold a client in a global: construct a fresh [`BackendClient`]
//! inside each operation that needs one. The handles are cheap (one
//! `reqwest::Client` plus two strings) and the hosted platform expects
//! short-lived stateless callers.

pub mod client;
pub mod rpc;

pub use client::{BackendClient, BackendError};
pub use rpc::normalize_rows;
