//! File type support for the `gw2tex-rs` project.

mod error;

pub mod atex;

// Re-export unified error type
pub use error::AtexError;

// Re-export main file types
pub use atex::{File as AtexFile, Header as AtexHeader, RasterImage};
