//! Vantage: Context-Scoped State Arbitration
//!
//! An in-process coordination library that keeps client-visible dashboard state
//! correct when the active context (selected server) can change at any time,
//! fetches for the same resource can overlap, and optimistic mutations can race
//! with each other and with context switches. Recency is proven with per-scope
//! fencing tickets; stale completions are discarded, never cancelled.

pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod mutation;
pub mod pending;
pub mod poller;
pub mod remote;
pub mod ticket;
pub mod types;
