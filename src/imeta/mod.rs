//! Core image metadata decoding module.
//!
//! # Layers
//!
//! - [`reader`]: Entry point; detects the container and drives the decode
//! - [`format`]: Container framing and embedded-section decoders
//! - [`codec`]: Byte order and typed value decoding
//! - [`types`]: Data model, errors and container recognizer traits

pub mod codec;
pub mod format;
pub mod reader;
pub mod types;
mod utils;

pub use reader::{ImetaReader, ReadOptions, Registry, read, read_from_buf, read_from_file};
pub use types::error::{ImetaError, Result};
