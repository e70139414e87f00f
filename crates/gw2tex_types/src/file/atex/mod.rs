//! ATEX texture container support for the `gw2tex-rs` project.
//!
//! ## Overview
//!
//! ATEX is the compressed texture container served by the Guild Wars 2
//! asset CDN. It wraps a block-compressed image (DXT1 or DXT5) in a
//! custom layer that exploits redundancy between 4×4 pixel blocks using
//! a fixed prefix code plus several specialized block-run encodings.
//! Decoding runs in three stages: the block-run layer is inflated back
//! into a DXT byte stream, the DXT blocks are expanded into BGRA pixels,
//! and the pixels are packaged as an RGBA raster.
//!
//! ## Container layout
//!
//! | Bytes  | Field                                                  |
//! |--------|--------------------------------------------------------|
//! | 0..4   | Container magic ("ATEX", "ATTX", "ATEC", "ATEP", "ATEU" or "ATET") |
//! | 4..8   | Pixel format `FourCC` ("DXT1" / "DXT5")                |
//! | 8..10  | Width in pixels (little-endian u16)                    |
//! | 10..12 | Height in pixels (little-endian u16)                   |
//! | 12..16 | Data-section length (read, not validated)              |
//! | 16..20 | Compression flags selecting the block-run decoders     |
//! | 20..   | Bit stream of Huffman runs, then raw bulk words        |
//!
//! The payload is consumed as little-endian 32-bit words; one padding
//! word is skipped at every 0x4000-word chunk boundary.

mod bits;
mod dxt;
mod huffman;
mod inflate;


use std::fmt::Display;
use std::io::Read;

use crate::file::error::AtexError;

mod constants {
	/// Container magics of the ATEX family
	pub const CONTAINER_MAGICS: [[u8; 4]; 6] =
		[*b"ATEX", *b"ATTX", *b"ATEC", *b"ATEP", *b"ATEU", *b"ATET"];

	/// Minimum number of bytes needed to inspect the container header
	pub const HEADER_SIZE: usize = 0x10;

	/// "DXT1" as a little-endian u32
	pub const FCC_DXT1: u32 = 0x3154_5844;

	/// "DXT5" as a little-endian u32
	pub const FCC_DXT5: u32 = 0x3554_5844;
}

pub(crate) mod flags {
	//! Format flag bits derived from the pixel format `FourCC`.

	/// Format carries a color component
	pub const COLOR: u16 = 0x10;
	/// Format carries an alpha component
	pub const ALPHA: u16 = 0x20;
	/// Alpha is deduced from the color data (DXT1)
	pub const DEDUCED_ALPHA_COMP: u16 = 0x40;
	/// Alpha is stored as its own plain component (DXT5)
	pub const PLAIN_COMP: u16 = 0x80;
	/// Two color components share a block
	pub const BICOLOR_COMP: u16 = 0x200;
}

pub(crate) mod compression {
	//! Compression flag bits from the container prelude.

	/// Run decoder filling blocks with opaque white
	pub const WHITE_COLOR: u32 = 0x01;
	/// Run decoder for 4-bit constant alpha (not implemented)
	pub const CONSTANT_ALPHA_4BITS: u32 = 0x02;
	/// Run decoder for 8-bit constant alpha
	pub const CONSTANT_ALPHA_8BITS: u32 = 0x04;
	/// Run decoder for a single flat color
	pub const PLAIN_COLOR: u32 = 0x08;
}

/// Pixel format and block geometry deduced from the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FullFormat {
	/// Format flag bits
	pub flags: u16,
	/// Bits of storage per pixel (4 for DXT1, 8 for DXT5)
	pub pixel_size_in_bits: u16,
	/// Pixel format `FourCC` as a little-endian `u32`
	pub fourcc: u32,
	/// Image width in pixels
	pub width: u16,
	/// Image height in pixels
	pub height: u16,
	/// Number of 4×4 pixel blocks
	pub num_blocks: u32,
	/// Bytes of storage per block
	pub bytes_per_block: u32,
	/// Bytes per component (half a block for two-component formats)
	pub bytes_per_component: u32,
	/// Whether a block holds separate alpha and color components
	pub has_two_components: bool,
}

impl FullFormat {
	/// Derives the format record from a pixel format `FourCC` and the
	/// header dimensions.
	pub(crate) fn deduce(fourcc: u32, width: u16, height: u16) -> Result<Self, AtexError> {
		let (format_flags, pixel_size_in_bits) = match fourcc {
			constants::FCC_DXT1 => (flags::COLOR | flags::ALPHA | flags::DEDUCED_ALPHA_COMP, 4),
			constants::FCC_DXT5 => (flags::COLOR | flags::ALPHA | flags::PLAIN_COMP, 8),
			other => return Err(AtexError::UnsupportedFormat(other)),
		};

		let num_blocks = (u32::from(width) + 3) / 4 * ((u32::from(height) + 3) / 4);
		let bytes_per_block = u32::from(pixel_size_in_bits) * 4 * 4 / 8;
		let two_component_mask = flags::PLAIN_COMP | flags::COLOR | flags::ALPHA;
		let has_two_components = (format_flags & two_component_mask) == two_component_mask
			|| (format_flags & flags::BICOLOR_COMP) != 0;
		let bytes_per_component = if has_two_components {
			bytes_per_block / 2
		} else {
			bytes_per_block
		};

		Ok(Self {
			flags: format_flags,
			pixel_size_in_bits,
			fourcc,
			width,
			height,
			num_blocks,
			bytes_per_block,
			bytes_per_component,
			has_two_components,
		})
	}

	/// Size in bytes of the reconstructed block-compressed stream.
	pub(crate) fn output_size(&self) -> usize {
		self.bytes_per_block as usize * self.num_blocks as usize
	}
}

/// Header of an ATEX container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	magic: [u8; 4],
	fourcc: u32,
	width: u16,
	height: u16,
}

impl Header {
	/// Minimum number of bytes [`Header::from_bytes`] needs.
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Parses and validates a container header from the given bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Header, AtexError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(AtexError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}

		let magic = [data[0], data[1], data[2], data[3]];
		if !constants::CONTAINER_MAGICS.contains(&magic) {
			return Err(AtexError::UnknownContainer(magic));
		}

		let fourcc = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
		if fourcc != constants::FCC_DXT1 && fourcc != constants::FCC_DXT5 {
			return Err(AtexError::UnsupportedFormat(fourcc));
		}

		let width = u16::from_le_bytes([data[8], data[9]]);
		let height = u16::from_le_bytes([data[10], data[11]]);

		Ok(Header {
			magic,
			fourcc,
			width,
			height,
		})
	}

	/// Loads a container header from any reader.
	///
	/// This allows peeking at the dimensions and pixel format without
	/// reading, let alone decoding, the whole file.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, AtexError> {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		reader.read_exact(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Returns the container magic.
	pub fn magic(&self) -> [u8; 4] {
		self.magic
	}

	/// Returns the pixel format `FourCC` as a little-endian `u32`.
	pub fn fourcc(&self) -> u32 {
		self.fourcc
	}

	/// Returns the image width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the image height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let fourcc = self.fourcc.to_le_bytes();
		write!(
			f,
			"ATEX Container Header:\n\
			- Magic: {}\n\
			- Pixel Format: {}\n\
			- Width: {} pixels\n\
			- Height: {} pixels",
			String::from_utf8_lossy(&self.magic),
			String::from_utf8_lossy(&fourcc),
			self.width,
			self.height,
		)
	}
}

/// A decoded RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
	width: u16,
	height: u16,
	pixels: Vec<u8>,
}

impl RasterImage {
	/// Returns the raster width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the raster height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the pixel data, 4 bytes per pixel in RGBA order.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Consumes the raster and returns the raw RGBA bytes.
	pub fn into_raw(self) -> Vec<u8> {
		self.pixels
	}
}

/// Decodes a texture container into an RGBA raster.
///
/// The caller-declared dimensions size the output raster; the dimensions
/// encoded in the container header drive the block layout. Trailing
/// input bytes that do not fill a whole 32-bit word are ignored.
pub fn decode(data: &[u8], width: u16, height: u16) -> Result<RasterImage, AtexError> {
	let words: Vec<u32> = data
		.chunks_exact(4)
		.map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
		.collect();

	let mut state = inflate::Inflater::new(&words);
	let format = state.read_full_format()?;
	let decoded = state.inflate_data(&format)?;

	let colors = match format.fourcc {
		constants::FCC_DXT1 => dxt::process_dxt1(&decoded, format.width, format.height),
		constants::FCC_DXT5 => dxt::process_dxt5(&decoded, format.width, format.height),
		other => return Err(AtexError::UnsupportedFormat(other)),
	};

	let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height) * 4);
	for y in 0..height {
		for x in 0..width {
			// Pixels outside the header-declared grid stay transparent.
			let color = if x < format.width && y < format.height {
				colors[usize::from(y) * usize::from(format.width) + usize::from(x)]
			} else {
				dxt::Bgra::default()
			};

			pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
		}
	}

	Ok(RasterImage {
		width,
		height,
		pixels,
	})
}

/// Representation of a decoded ATEX file.
#[derive(Debug)]
pub struct File {
	/// Header of the container
	header: Header,

	/// Decoded raster, sized by the header dimensions
	image: RasterImage,
}

impl File {
	/// Returns a reference to the container header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns a reference to the decoded raster.
	pub fn image(&self) -> &RasterImage {
		&self.image
	}

	/// Consumes the file and returns the decoded raster.
	pub fn into_image(self) -> RasterImage {
		self.image
	}

	/// Parses and decodes a container from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, AtexError> {
		let header = Header::from_bytes(data)?;
		let image = decode(data, header.width(), header.height())?;

		Ok(Self { header, image })
	}

	/// Opens and decodes an ATEX file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, AtexError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Reads and decodes a container from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, AtexError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}
}
