//! Prelude module for `gw2tex_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```no_run
//! use gw2tex_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let header = AtexHeader::from_bytes(&[0u8; 16]);
//! assert!(header.is_err());
//! ```

// Re-export everything from gw2tex_types::prelude
#[doc(inline)]
pub use gw2tex_types::prelude::*;

// Re-export the entire gw2tex_types module for advanced usage
#[doc(inline)]
pub use gw2tex_types;
