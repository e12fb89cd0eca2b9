//! Runtime layer for the review monitor.
//!
//! Owns the committed review session and its asynchronous reload, the
//! dashboard filter state with its derived view model, and the input
//! debouncer used by the terminal UI.

pub mod dashboard;
pub mod debounce;
pub mod session_store;

pub use review_core as core;
pub use review_data as data;
