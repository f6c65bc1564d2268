//! Integration tests.
//!
//! Everything here runs against in-memory or loopback fakes; nothing
//! reaches the real league API or value feed.

mod history;
mod loader;
mod reconcile;
