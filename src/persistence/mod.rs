//! Persistence layer: local JSON state.
//!
//! The console keeps two small documents in its state directory: the last
//! working copy of listings and the moderator's preferences. Both are
//! plain JSON written atomically, and both are disposable: a missing or
//! unreadable file loads as empty state.

pub mod local;
pub mod models;

pub use local::LocalStore;
