//! Benchmark helper utilities for gw2tex-rs
//!
//! This module provides utilities for generating synthetic ATEX
//! containers that exercise the decoder's major code paths: the
//! Huffman-coded block runs and the raw bulk copy.

/// Packs bits MSB-first into little-endian 32-bit words, the layout the
/// container's bit reader consumes.
#[derive(Default)]
pub struct StreamBuilder {
	words: Vec<u32>,
	current: u32,
	used: u8,
}

impl StreamBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends the low `bits` bits of `value`, most significant first.
	pub fn push_bits(&mut self, value: u32, bits: u8) {
		for shift in (0..bits).rev() {
			let bit = (value >> shift) & 1;
			self.current |= bit << (31 - self.used);
			self.used += 1;
			if self.used == 32 {
				self.words.push(self.current);
				self.current = 0;
				self.used = 0;
			}
		}
	}

	/// Appends the Huffman code for a run of `count` blocks followed by
	/// the 1-bit apply flag. Valid counts are 1 through 18.
	pub fn push_run(&mut self, count: u32, value: u32) {
		match count {
			1 => self.push_bits(0b1, 1),
			18 => self.push_bits(0b01, 2),
			2..=17 => self.push_bits(17 - count, 6),
			_ => panic!("no code for run length {count}"),
		}
		self.push_bits(value, 1);
	}

	/// Pads the stream to the next word boundary.
	pub fn align(&mut self) {
		if self.used > 0 {
			self.words.push(self.current);
			self.current = 0;
			self.used = 0;
		}
	}

	/// Appends a raw word; the stream must be word-aligned.
	pub fn push_word(&mut self, word: u32) {
		assert_eq!(self.used, 0, "raw words must be pushed on a word boundary");
		self.words.push(word);
	}

	/// Serializes the stream as container bytes.
	pub fn finish(mut self) -> Vec<u8> {
		self.align();
		self.words.iter().flat_map(|word| word.to_le_bytes()).collect()
	}
}

fn header(fourcc: &[u8; 4], width: u16, height: u16, compression_flags: u32) -> StreamBuilder {
	let mut builder = StreamBuilder::new();
	builder.push_bits(u32::from_le_bytes(*b"ATEX"), 32);
	builder.push_bits(u32::from_le_bytes(*fourcc), 32);
	builder.push_bits(u32::from(height), 16);
	builder.push_bits(u32::from(width), 16);
	builder.push_bits(0, 32);
	builder.push_bits(compression_flags, 32);
	builder
}

/// Generates a DXT1 container covered entirely by white-color runs.
///
/// This exercises the Huffman run loop without touching the bulk copier.
pub fn generate_white_dxt1(width: u16, height: u16) -> Vec<u8> {
	let mut builder = header(b"DXT1", width, height, 0x01);

	let mut remaining = (u32::from(width) + 3) / 4 * ((u32::from(height) + 3) / 4);
	while remaining > 0 {
		let count = remaining.min(18);
		builder.push_run(count, 1);
		remaining -= count;
	}

	builder.finish()
}

/// Generates a DXT5 container with no compressed runs at all.
///
/// Every block is filled by the bulk copier: two alpha words per block
/// in stream order, then the color words column-wise.
pub fn generate_bulk_dxt5(width: u16, height: u16) -> Vec<u8> {
	let mut builder = header(b"DXT5", width, height, 0);
	builder.align();

	let num_blocks = (u32::from(width) + 3) / 4 * ((u32::from(height) + 3) / 4);
	for block in 0..num_blocks {
		builder.push_word(0xFFFF);
		builder.push_word(block);
	}
	for block in 0..num_blocks {
		builder.push_word((block << 16) | 0xF800);
	}
	for _ in 0..num_blocks {
		builder.push_word(0);
	}

	builder.finish()
}

/// Common benchmark sizes for synthetic containers
pub mod sizes {
	/// Tiny texture: 64x64
	pub const TINY: (u16, u16) = (64, 64);
	/// Small texture: 256x256
	pub const SMALL: (u16, u16) = (256, 256);
	/// Typical in-game asset: 512x512
	pub const MEDIUM: (u16, u16) = (512, 512);
	/// Large UI texture: 1024x1024
	pub const LARGE: (u16, u16) = (1024, 1024);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_white_dxt1() {
		let data = generate_white_dxt1(64, 64);

		assert_eq!(&data[0..4], b"ATEX");
		assert_eq!(&data[4..8], b"DXT1");
		assert_eq!(u16::from_le_bytes([data[8], data[9]]), 64);
		assert_eq!(u16::from_le_bytes([data[10], data[11]]), 64);

		let image = gw2tex_types::file::atex::decode(&data, 64, 64).unwrap();
		assert!(image.pixels().iter().all(|&byte| byte == 0xFF));
	}

	#[test]
	fn test_generate_bulk_dxt5() {
		let data = generate_bulk_dxt5(64, 64);
		let image = gw2tex_types::file::atex::decode(&data, 64, 64).unwrap();
		assert_eq!(image.pixels().len(), 64 * 64 * 4);
	}
}
