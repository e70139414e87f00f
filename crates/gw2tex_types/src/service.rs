//! Collaborator interfaces for the serving layer.
//!
//! The decoder is a pure function; fetching containers from the asset
//! CDN, caching blobs, and exposing an HTTP surface are jobs of the
//! enclosing service. The traits here pin down the contracts that
//! service programs against without pulling any transport or storage
//! dependency into this crate.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL of the asset CDN; the file identifier is appended.
pub const ASSET_CDN_URL: &str = "http://assetcdn.101.ArenaNetworks.com/program/101/1/0/";

/// Value of the `authCookie` cookie sent with every CDN request.
pub const ASSET_CDN_AUTH_COOKIE: &str =
	"access=/latest/*!/manifest/program/*!/program/*~md5=4e51ad868f87201ad93e428ff30c6691";

/// Timeout applied to a single CDN fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Representation under which a blob is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
	/// Raw container bytes as fetched from the CDN
	Uncompressed,
	/// Decoded raster encoded as PNG
	Png,
}

impl FileKind {
	/// Returns the cache key column value for this kind.
	pub fn as_str(self) -> &'static str {
		match self {
			FileKind::Uncompressed => "uncompressed",
			FileKind::Png => "png",
		}
	}
}

impl std::fmt::Display for FileKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A cached blob together with its bookkeeping columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFile {
	/// Identifier of the file on the asset CDN
	pub file_id: String,
	/// Representation stored in `content`
	pub kind: FileKind,
	/// The blob itself
	pub content: Vec<u8>,
	/// When the blob was produced
	pub last_modified: DateTime<Utc>,
}

/// Errors produced by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
	/// The backing store reported a failure
	#[error("cache backend failure: {0}")]
	Backend(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors produced by fetch backends
#[derive(Debug, Error)]
pub enum FetchError {
	/// Upstream answered with a non-success status
	#[error("upstream returned status {0}")]
	Status(u16),

	/// The request never completed
	#[error("transport failure: {0}")]
	Transport(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Blob cache keyed by `(file_id, kind)`.
pub trait BlobCache {
	/// Looks up a blob; `Ok(None)` when the key is absent.
	fn get(&self, file_id: &str, kind: FileKind) -> Result<Option<CachedFile>, CacheError>;

	/// Stores a blob under its `(file_id, kind)` key, replacing any
	/// previous entry.
	fn put(&mut self, file: CachedFile) -> Result<(), CacheError>;
}

/// Upstream fetcher for raw texture containers.
pub trait AssetFetcher {
	/// Fetches the raw container bytes for `file_id` from the CDN.
	fn fetch(&mut self, file_id: &str) -> Result<Vec<u8>, FetchError>;
}
