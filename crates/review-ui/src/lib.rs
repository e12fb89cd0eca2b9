//! Terminal UI layer for the review monitor.
//!
//! Provides themes, the header component, trend charts, the product table,
//! the review card list, and the main dashboard event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod review_list;
pub mod table_view;
pub mod themes;

pub use review_core as core;
