//! Prelude module for `gw2tex_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and functions.
//!
//! # Examples
//!
//! ```no_run
//! use gw2tex_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let file = AtexFile::open("texture.atex")?;
//! println!("{}", file.header());
//! # Ok::<(), AtexError>(())
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{AtexError, AtexFile, AtexHeader, RasterImage};

// Decoder entry point
#[doc(inline)]
pub use crate::file::atex::decode;

// Serving-layer collaborator interfaces
#[doc(inline)]
pub use crate::service::{AssetFetcher, BlobCache, CacheError, CachedFile, FetchError, FileKind};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
