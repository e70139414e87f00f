#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `gw2tex-rs` decodes the proprietary compressed texture containers
//! served by the Guild Wars 2 asset CDN into plain RGBA rasters.
//!
pub use gw2tex_internal::*;
