//! Foundational data structures, error types, and container recognizers.

pub mod error;
pub mod filetypes;
pub mod models;
