//! Error types for texture container parsing and decoding.

use thiserror::Error;

/// Errors that can occur when parsing or decoding ATEX texture containers
#[derive(Debug, Error)]
pub enum AtexError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Container magic is not part of the ATEX family
	#[error("Unknown container magic: {0:02X?}")]
	UnknownContainer([u8; 4]),

	/// Pixel format `FourCC` is neither DXT1 nor DXT5
	#[error("Unsupported pixel format FourCC: 0x{0:08X}")]
	UnsupportedFormat(u32),

	/// A compression flag selects a decoder this implementation does not provide
	#[error("Unsupported compression feature: {0}")]
	UnsupportedFeature(&'static str),

	/// The bit reader ran past the already zero-padded end of the input
	#[error("Reached end of input while fetching a new word")]
	Truncated,

	/// Bit-reader contract violated by the caller
	#[error("Invalid bit request: asked for {requested} bits with {available} available")]
	InvalidBitRequest {
		/// Number of bits requested
		requested: u8,
		/// Number of bits currently buffered
		available: u8,
	},

	/// A code was read before the prefix-code table was built
	#[error("Huffman table not initialized")]
	HuffmanUninitialized,

	/// A 32-bit peek did not map to any entry of the prefix-code table
	#[error("Bit pattern does not match any Huffman code")]
	InvalidCode,

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
