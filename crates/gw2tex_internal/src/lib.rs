//! Internal crate for `gw2tex-rs`.
//!
//! This module is separated into its own crate to keep the facade crate
//! thin, and should not be used directly.
//!
//! # Examples
//!
//! ```no_run
//! use gw2tex_internal::prelude::*;
//!
//! // All commonly used types are available
//! let file = AtexFile::open("texture.atex")?;
//! let image = file.into_image();
//! # Ok::<(), AtexError>(())
//! ```

/// `use gw2tex_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export gw2tex_types for convenience
pub use gw2tex_types;
