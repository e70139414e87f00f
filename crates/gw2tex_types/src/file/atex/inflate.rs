//! Inflater for the block-run compression layer wrapped around the DXT data.
//!
//! The container encodes redundancy between 4×4 pixel blocks: specialized
//! run decoders place constant values into a sparse output buffer guarded
//! by per-block "already written" bitmaps, then a bulk pass copies the
//! remaining raw words from the input into every slot still unwritten.
//!
//! All three run decoders share one loop shape: read a run length as a
//! Huffman code, read a 1-bit apply flag, visit that many unwritten
//! blocks (writing the decoder's constant when the flag is set), then
//! skip forward over blocks already claimed by an earlier pass.

use log::{debug, info};

use super::bits::WordReader;
use super::huffman::HuffmanTable;
use super::{FullFormat, compression, flags};
use crate::file::error::AtexError;

/// Size in bytes of the endpoint pair at the start of a color component.
const COLOR_ENDPOINT_BYTES: usize = 4;

/// Decoder state for one container.
///
/// Owns the output buffer and the two written bitmaps; every pass takes
/// `&mut self`, so the sharing between the run decoders and the bulk
/// copier needs no further structure.
pub(super) struct Inflater<'a> {
	reader: WordReader<'a>,
	huffman: HuffmanTable,

	output: Vec<u8>,
	color_written: Vec<bool>,
	alpha_written: Vec<bool>,
}

impl<'a> Inflater<'a> {
	pub(super) fn new(words: &'a [u32]) -> Self {
		Self {
			reader: WordReader::new(words),
			huffman: HuffmanTable::fixed(),
			output: Vec::new(),
			color_written: Vec::new(),
			alpha_written: Vec::new(),
		}
	}

	/// Reads the container header and derives the block geometry.
	///
	/// Layout: one skipped magic word, the pixel format `FourCC`, then the
	/// height and the width as consecutive 16-bit fields.
	pub(super) fn read_full_format(&mut self) -> Result<FullFormat, AtexError> {
		self.reader.need_bits(32)?;
		self.reader.drop_bits(32)?;

		self.reader.need_bits(32)?;
		let fourcc = self.reader.read_bits(32);
		self.reader.drop_bits(32)?;

		self.reader.need_bits(32)?;
		let height = self.reader.read_bits(16) as u16;
		self.reader.drop_bits(16)?;
		let width = self.reader.read_bits(16) as u16;
		self.reader.drop_bits(16)?;

		let format = FullFormat::deduce(fourcc, width, height)?;
		debug!(
			"format: fourcc=0x{:08X} flags={:#012b} pixel_bits={} {}x{} blocks={} bytes_per_block={}",
			format.fourcc,
			format.flags,
			format.pixel_size_in_bits,
			format.width,
			format.height,
			format.num_blocks,
			format.bytes_per_block
		);

		Ok(format)
	}

	/// Runs the compressed passes and the bulk fill, returning the
	/// reconstructed block-compressed byte stream.
	pub(super) fn inflate_data(&mut self, format: &FullFormat) -> Result<Vec<u8>, AtexError> {
		self.output = vec![0; format.output_size()];
		self.color_written = vec![false; format.num_blocks as usize];
		self.alpha_written = vec![false; format.num_blocks as usize];

		self.reader.need_bits(32)?;
		let data_size = self.reader.read_bits(32);
		self.reader.drop_bits(32)?;

		self.reader.need_bits(32)?;
		let compression_flags = self.reader.read_bits(32);
		self.reader.drop_bits(32)?;

		debug!("data section size: {data_size}, compression flags: {compression_flags:#010b}");

		self.decompress(compression_flags, format)?;

		// Hand an unconsumed look-ahead word back to the input before
		// switching to word-granular reads.
		self.reader.realign();

		self.process_alpha(format);
		self.process_color(format);

		Ok(std::mem::take(&mut self.output))
	}

	/// Dispatches the run decoders selected by the compression flags,
	/// in their fixed order.
	fn decompress(&mut self, compression_flags: u32, format: &FullFormat) -> Result<(), AtexError> {
		if compression_flags & compression::WHITE_COLOR != 0 {
			self.decode_white_color(format)?;
		}
		if compression_flags & compression::CONSTANT_ALPHA_4BITS != 0 {
			info!("constant alpha from 4 bits requested; no known corpus sample uses it");
			return Err(AtexError::UnsupportedFeature("constant alpha from 4 bits"));
		}
		if compression_flags & compression::CONSTANT_ALPHA_8BITS != 0 {
			self.decode_constant_alpha_from_8_bits(format)?;
		}
		if compression_flags & compression::PLAIN_COLOR != 0 {
			self.decode_plain_color(format)?;
		}

		Ok(())
	}

	fn decode_white_color(&mut self, format: &FullFormat) -> Result<(), AtexError> {
		let mut pos: u32 = 0;

		while pos < format.num_blocks {
			let count = self.huffman.read_code(&mut self.reader)?;

			self.reader.need_bits(1)?;
			let value = self.reader.read_bits(1);
			self.reader.drop_bits(1)?;

			pos = self.apply_white_color(count, pos, value, format);

			while pos < format.num_blocks && self.color_written[pos as usize] {
				pos += 1;
			}
		}

		Ok(())
	}

	/// Visits `count` blocks not yet claimed by an alpha pass; when
	/// `value` is set, fills the endpoint bytes with 0xFF and claims the
	/// block for both components. The selector bits stay clear, so a
	/// single-component block decodes as solid opaque white.
	fn apply_white_color(&mut self, mut count: u16, mut pos: u32, value: u32, format: &FullFormat) -> u32 {
		while count > 0 && pos < format.num_blocks {
			if !self.alpha_written[pos as usize] {
				if value != 0 {
					let offset = format.bytes_per_block as usize * pos as usize;
					let fill = if format.has_two_components {
						format.bytes_per_component as usize
					} else {
						COLOR_ENDPOINT_BYTES
					};

					for byte in &mut self.output[offset..offset + fill] {
						*byte = 0xFF;
					}

					self.alpha_written[pos as usize] = true;
					self.color_written[pos as usize] = true;
				}
				count -= 1;
			}
			pos += 1;
		}

		pos
	}

	fn decode_constant_alpha_from_8_bits(&mut self, format: &FullFormat) -> Result<(), AtexError> {
		self.reader.need_bits(8)?;
		let alpha_byte = u64::from(self.reader.read_bits(8));
		self.reader.drop_bits(8)?;

		let alpha_value = alpha_byte | (alpha_byte << 8);

		let mut pos: u32 = 0;

		while pos < format.num_blocks {
			let (count, value, alpha) = self.read_constant_alpha(alpha_value)?;

			pos = self.apply_constant_alpha(count, pos, value, alpha, format);

			while pos < format.num_blocks && self.alpha_written[pos as usize] {
				pos += 1;
			}
		}

		Ok(())
	}

	/// Reads one constant-alpha run header: the run length code, the
	/// apply bit, and the is-not-null bit. The latter is peeked on every
	/// iteration but consumed only when the apply bit is set.
	fn read_constant_alpha(&mut self, alpha_value: u64) -> Result<(u16, u32, u64), AtexError> {
		let count = self.huffman.read_code(&mut self.reader)?;

		self.reader.need_bits(2)?;
		let value = self.reader.read_bits(1);
		self.reader.drop_bits(1)?;

		let is_not_null = self.reader.read_bits(1);
		if value != 0 {
			self.reader.drop_bits(1)?;
		}

		let alpha = if is_not_null == 0 { 0 } else { alpha_value };

		Ok((count, value, alpha))
	}

	fn apply_constant_alpha(
		&mut self,
		mut count: u16,
		mut pos: u32,
		value: u32,
		alpha: u64,
		format: &FullFormat,
	) -> u32 {
		let alpha_bytes = alpha.to_le_bytes();

		while count > 0 && pos < format.num_blocks {
			if !self.alpha_written[pos as usize] {
				if value != 0 {
					let offset = format.bytes_per_block as usize * pos as usize;
					let size = format.bytes_per_component as usize;

					self.output[offset..offset + size].copy_from_slice(&alpha_bytes[..size]);

					self.alpha_written[pos as usize] = true;
				}
				count -= 1;
			}
			pos += 1;
		}

		pos
	}

	fn decode_plain_color(&mut self, format: &FullFormat) -> Result<(), AtexError> {
		self.reader.need_bits(24)?;
		let blue = self.reader.read_bits(8);
		self.reader.drop_bits(8)?;
		let green = self.reader.read_bits(8);
		self.reader.drop_bits(8)?;
		let red = self.reader.read_bits(8);
		self.reader.drop_bits(8)?;

		let final_value = plain_color_value(red, green, blue, format.flags);
		let final_bytes = final_value.to_le_bytes();

		let mut pos: u32 = 0;

		while pos < format.num_blocks {
			let count = self.huffman.read_code(&mut self.reader)?;

			self.reader.need_bits(1)?;
			let value = self.reader.read_bits(1);
			self.reader.drop_bits(1)?;

			pos = self.apply_plain_color(count, pos, value, &final_bytes, format);

			while pos < format.num_blocks && self.color_written[pos as usize] {
				pos += 1;
			}
		}

		Ok(())
	}

	fn apply_plain_color(
		&mut self,
		mut count: u16,
		mut pos: u32,
		value: u32,
		final_bytes: &[u8; 8],
		format: &FullFormat,
	) -> u32 {
		while count > 0 && pos < format.num_blocks {
			if self.color_written[pos as usize] {
				pos += 1;
				continue;
			}

			if value != 0 {
				let mut offset = format.bytes_per_block as usize * pos as usize;
				if format.has_two_components {
					offset += format.bytes_per_component as usize;
				}
				let size = format.bytes_per_component as usize;

				self.output[offset..offset + size].copy_from_slice(&final_bytes[..size]);

				self.color_written[pos as usize] = true;
			}
			count -= 1;

			pos += 1;
		}

		pos
	}

	/// Copies raw input words into the alpha region of every block the
	/// run decoders left unwritten. Stops as soon as the input runs dry.
	fn process_alpha(&mut self, format: &FullFormat) {
		let plain_alpha = (format.flags & flags::ALPHA) != 0
			&& (format.flags & flags::DEDUCED_ALPHA_COMP) == 0;
		if !plain_alpha && (format.flags & flags::BICOLOR_COMP) == 0 {
			return;
		}

		for index in 0..format.num_blocks as usize {
			if self.alpha_written[index] {
				continue;
			}

			let Some(word) = self.reader.next_word() else {
				break;
			};

			let offset = format.bytes_per_block as usize * index;
			self.output[offset..offset + 4].copy_from_slice(&word.to_le_bytes());

			if format.bytes_per_component > 4 {
				let Some(word) = self.reader.next_word() else {
					break;
				};

				self.output[offset + 4..offset + 8].copy_from_slice(&word.to_le_bytes());
			}
		}
	}

	/// Copies raw input words into the color region of every block the
	/// run decoders left unwritten.
	///
	/// Components wider than one word are stored column-wise: the stream
	/// carries the first word of every unwritten block, then a second
	/// pass supplies the remaining word of each.
	fn process_color(&mut self, format: &FullFormat) {
		if (format.flags & flags::COLOR) == 0 && (format.flags & flags::BICOLOR_COMP) == 0 {
			return;
		}

		for index in 0..format.num_blocks as usize {
			if self.color_written[index] {
				continue;
			}

			let Some(word) = self.reader.next_word() else {
				break;
			};

			let mut offset = format.bytes_per_block as usize * index;
			if format.has_two_components {
				offset += format.bytes_per_component as usize;
			}

			self.output[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
		}

		if format.bytes_per_component > 4 {
			for index in 0..format.num_blocks as usize {
				if self.color_written[index] {
					continue;
				}

				let Some(word) = self.reader.next_word() else {
					break;
				};

				let mut offset = format.bytes_per_block as usize * index + 4;
				if format.has_two_components {
					offset += format.bytes_per_component as usize;
				}

				self.output[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
			}
		}
	}
}

/// Derives the 64-bit constant a plain-color run writes into a color
/// component: two RGB565 endpoints plus a replicated 2-bit selector
/// pattern approximating the requested 8-bit-per-channel color.
fn plain_color_value(red: u32, green: u32, blue: u32, format_flags: u16) -> u64 {
	// Quantize each channel to its RGB565 width, then expand back to
	// measure the rounding error.
	let red_q = (red - (red >> 5)) >> 3;
	let blue_q = (blue - (blue >> 5)) >> 3;
	let green_q = (green - (green >> 6)) >> 2;

	let red_back = (red_q << 3) + (red_q >> 2);
	let blue_back = (blue_q << 3) + (blue_q >> 2);
	let green_back = (green_q << 2) + (green_q >> 4);

	let red_flag = u32::from(red_q & 0x11 == 0x11);
	let blue_flag = u32::from(blue_q & 0x11 == 0x11);
	let green_flag = u32::from(green_q & 0x1111 == 0x1111);

	// Rounding error on a 0..12 scale per channel.
	let red_comp = 12 * (red - red_back) / (8 - red_flag);
	let blue_comp = 12 * (blue - blue_back) / (8 - blue_flag);
	let green_comp = 12 * (green - green_back) / (8 - green_flag);

	let (red1, red2) = endpoint_split(red_comp, red_q);
	let (blue1, blue2) = endpoint_split(blue_comp, blue_q);
	let (green1, green2) = endpoint_split(green_comp, green_q);

	let mut color1 = blue1 | ((green1 | (red1 << 6)) << 5);
	let mut color2 = blue2 | ((green2 | (red2 << 6)) << 5);

	let mut acc = (0u32, 0u32);
	acc = fold_channel(acc, blue1, blue2, blue_q, blue_comp);
	acc = fold_channel(acc, red1, red2, red_q, red_comp);
	acc = fold_channel(acc, green1, green2, green_q, green_comp);

	let (mut level, weight) = acc;
	if weight > 0 {
		level = (level + weight / 2) / weight;
	}

	let dxt1_special_case = (format_flags & flags::DEDUCED_ALPHA_COMP) != 0
		&& (level == 5 || level == 6 || weight != 0);

	if weight > 0 && !dxt1_special_case {
		// Force distinct endpoints so the block stays in four-color
		// mode, pushing the whole error onto the selector.
		if color2 == 0xFFFF {
			level = 12;
			color1 -= 1;
		} else {
			level = 0;
			color2 += 1;
		}
	}

	if color2 >= color1 {
		std::mem::swap(&mut color1, &mut color2);
		level = 12 - level;
	}

	let chosen: u64 = if dxt1_special_case {
		2
	} else if level < 2 {
		0
	} else if level < 6 {
		2
	} else if level < 10 {
		3
	} else {
		1
	};

	let mut pattern = chosen | (chosen << 2) | ((chosen | (chosen << 2)) << 4);
	pattern |= pattern << 8;
	pattern |= pattern << 16;

	u64::from(color1) | (u64::from(color2) << 16) | (pattern << 32)
}

/// Distributes a channel's rounding error onto its two endpoints.
fn endpoint_split(comp: u32, base: u32) -> (u32, u32) {
	if comp < 2 {
		(base, base)
	} else if comp < 6 {
		(base, base + 1)
	} else if comp < 10 {
		(base + 1, base)
	} else {
		(base + 1, base + 1)
	}
}

/// Accumulates the selector level over channels whose endpoints differ.
fn fold_channel(acc: (u32, u32), value1: u32, value2: u32, base: u32, comp: u32) -> (u32, u32) {
	let (mut level, mut weight) = acc;

	if value1 != value2 {
		if value1 == base {
			level += comp;
		} else {
			level += 12 - comp;
		}
		weight += 1;
	}

	(level, weight)
}
