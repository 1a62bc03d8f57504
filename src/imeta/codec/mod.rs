//! Codec layer for turning raw bytes into typed values.
//!
//! # Submodules
//!
//! - [`byte_order`][]: Run-time selected little/big-endian integer reads
//! - [`value`][]: The typed value codec (type tag → width and decoder)

pub mod byte_order;
pub mod value;
