//! Data layer for the review monitor.
//!
//! Discovers and parses dated review CSV exports, deduplicates reviews across
//! exports, groups them per day and product, and exposes pure query functions
//! and dense daily series over the loaded session.

pub mod aggregator;
pub mod analysis;
pub mod dedup;
pub mod query;
pub mod reader;
pub mod series;
pub mod snapshot;

pub use review_core as core;
