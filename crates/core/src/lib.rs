//! Donation Relay Core - domain model, bounded buffer and polling protocol.
//!
//! This crate holds everything that has design content in the relay: how an
//! incoming webhook payload becomes a donation record, how the bounded buffer
//! evicts old records, and how a client cursor is reconciled against the
//! buffer. It has no knowledge of HTTP.

pub mod constants;
pub mod donations;
pub mod errors;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
