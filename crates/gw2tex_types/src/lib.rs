//! This crate provides the core data types and texture container support
//! for the `gw2tex-rs` project.
//!
//! # File Formats
//!
//! - **ATEX**: Compressed texture containers served by the Guild Wars 2
//!   asset CDN, wrapping DXT1/DXT5 data in a block-run compression layer
//!
//! # Examples
//!
//! ```no_run
//! use gw2tex_types::file::{AtexFile, AtexHeader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Peek at the header without decoding
//! let mut file = std::fs::File::open("texture.atex")?;
//! let header = AtexHeader::from_reader(&mut file)?;
//! println!("{}x{}", header.width(), header.height());
//!
//! // Or decode the whole container
//! let decoded = AtexFile::open("texture.atex")?;
//! let image = decoded.image();
//! assert_eq!(image.pixels().len(), usize::from(image.width()) * usize::from(image.height()) * 4);
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod prelude;
pub mod service;

// Re-export commonly used types at crate root for convenience
pub use file::{AtexError, AtexFile, AtexHeader, RasterImage};
