//! Core types for the review monitor.
//!
//! Holds the review data model, the error taxonomy, calendar-day utilities,
//! display formatting helpers and the command-line settings shared by every
//! other crate in the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
