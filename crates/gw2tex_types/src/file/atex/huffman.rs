//! Fixed canonical prefix-code table used by the block-run decoders.
//!
//! The code table is not transmitted in the stream. Every container uses
//! the same seed list of `(bit length, symbol)` pairs, from which two
//! decode structures are built: a 256-entry hash table resolving all
//! codes of up to 8 bits in one lookup, and a comparison table for
//! longer codes. With the fixed seed below every code fits in the hash
//! table; the comparison path exists because the build procedure is
//! generic over seed lists.

use super::bits::WordReader;
use crate::file::error::AtexError;

/// Maximum number of bits per code.
const MAX_CODE_BITS_LENGTH: usize = 32;
/// Maximum value for a symbol.
const MAX_SYMBOL_VALUE: usize = 285;
/// Codes of up to this many bits resolve through the hash table.
const MAX_NB_BITS_HASH: u8 = 8;

const SENTINEL: u16 = 0xFFFF;

/// Seed codes shared by every container.
///
/// Insertion order matters: among codes of the same bit length, symbols
/// inserted later occupy smaller canonical code values.
const SEED: [(u8, u16); 18] = [
	(1, 0x01),
	(2, 0x12),
	(6, 0x11),
	(6, 0x10),
	(6, 0x0F),
	(6, 0x0E),
	(6, 0x0D),
	(6, 0x0C),
	(6, 0x0B),
	(6, 0x0A),
	(6, 0x09),
	(6, 0x08),
	(6, 0x07),
	(6, 0x06),
	(6, 0x05),
	(6, 0x04),
	(6, 0x03),
	(6, 0x02),
];

/// Decode tables for the fixed prefix code.
pub(super) struct HuffmanTable {
	code_comp: [u32; MAX_CODE_BITS_LENGTH],
	symbol_value_offset: [u16; MAX_CODE_BITS_LENGTH],
	symbol_value: [u16; MAX_SYMBOL_VALUE],
	code_bits: [u8; MAX_CODE_BITS_LENGTH],

	symbol_hash: [u16; 1 << MAX_NB_BITS_HASH],
	code_bits_hash: [u8; 1 << MAX_NB_BITS_HASH],

	is_empty: bool,
}

impl Default for HuffmanTable {
	fn default() -> Self {
		Self {
			code_comp: [0; MAX_CODE_BITS_LENGTH],
			symbol_value_offset: [0; MAX_CODE_BITS_LENGTH],
			symbol_value: [0; MAX_SYMBOL_VALUE],
			code_bits: [0; MAX_CODE_BITS_LENGTH],
			symbol_hash: [SENTINEL; 1 << MAX_NB_BITS_HASH],
			code_bits_hash: [0; 1 << MAX_NB_BITS_HASH],
			is_empty: true,
		}
	}
}

impl HuffmanTable {
	/// Builds the decode tables from the fixed seed list.
	pub(super) fn fixed() -> Self {
		let mut working_bit_tab = [SENTINEL; MAX_CODE_BITS_LENGTH];
		let mut working_code_tab = [SENTINEL; MAX_SYMBOL_VALUE];

		for &(bits, symbol) in &SEED {
			insert_seed(bits, symbol, &mut working_bit_tab, &mut working_code_tab);
		}

		let mut table = Self::default();
		table.build(&working_bit_tab, &working_code_tab);
		table
	}

	/// Fills the decode structures from the two working columns.
	///
	/// `working_bit_tab[bits]` heads a linked list of symbols with that
	/// code length, threaded through `working_code_tab[symbol]`; walking
	/// a list visits symbols in decreasing canonical code value.
	fn build(
		&mut self,
		working_bit_tab: &[u16; MAX_CODE_BITS_LENGTH],
		working_code_tab: &[u16; MAX_SYMBOL_VALUE],
	) {
		let mut code: u32 = 0;
		let mut nb_bits: u8 = 0;

		// First part, filling the hash table for codes of at most
		// MAX_NB_BITS_HASH bits.
		while nb_bits <= MAX_NB_BITS_HASH {
			if working_bit_tab[nb_bits as usize] != SENTINEL {
				self.is_empty = false;

				let mut current_symbol = working_bit_tab[nb_bits as usize];
				while current_symbol != SENTINEL {
					let hash = code.wrapping_shl(u32::from(MAX_NB_BITS_HASH - nb_bits)) as u16;
					let next_hash = code
						.wrapping_add(1)
						.wrapping_shl(u32::from(MAX_NB_BITS_HASH - nb_bits)) as u16;

					for entry in hash..next_hash {
						self.symbol_hash[entry as usize] = current_symbol;
						self.code_bits_hash[entry as usize] = nb_bits;
					}

					current_symbol = working_code_tab[current_symbol as usize];
					code = code.wrapping_sub(1);
				}
			}
			code = code.wrapping_shl(1).wrapping_add(1);
			nb_bits += 1;
		}

		// Second part, filling the comparison structure for longer codes.
		let mut comp_index: usize = 0;
		let mut symbol_offset: u16 = 0;

		while (nb_bits as usize) < MAX_CODE_BITS_LENGTH {
			if working_bit_tab[nb_bits as usize] != SENTINEL {
				self.is_empty = false;

				let mut current_symbol = working_bit_tab[nb_bits as usize];
				while current_symbol != SENTINEL {
					self.symbol_value[symbol_offset as usize] = current_symbol;

					symbol_offset += 1;
					current_symbol = working_code_tab[current_symbol as usize];
					code = code.wrapping_sub(1);
				}

				// Minimum 32-bit-aligned code value for this length.
				self.code_comp[comp_index] = code.wrapping_add(1).wrapping_shl(32 - u32::from(nb_bits));
				self.code_bits[comp_index] = nb_bits;
				// Offset into symbol_value to reach the first symbol.
				self.symbol_value_offset[comp_index] = symbol_offset - 1;

				comp_index += 1;
			}
			code = code.wrapping_shl(1).wrapping_add(1);
			nb_bits += 1;
		}
	}

	/// Reads one code from the bit stream and returns its symbol.
	pub(super) fn read_code(&self, reader: &mut WordReader<'_>) -> Result<u16, AtexError> {
		if self.is_empty {
			return Err(AtexError::HuffmanUninitialized);
		}

		reader.need_bits(32)?;

		let peek = reader.read_bits(MAX_NB_BITS_HASH);
		if self.symbol_hash[peek as usize] != SENTINEL {
			let symbol = self.symbol_hash[peek as usize];
			reader.drop_bits(self.code_bits_hash[peek as usize])?;
			return Ok(symbol);
		}

		let word = reader.read_bits(32);
		let mut index = 0;
		while index < MAX_CODE_BITS_LENGTH && word < self.code_comp[index] {
			index += 1;
		}
		if index == MAX_CODE_BITS_LENGTH {
			return Err(AtexError::InvalidCode);
		}

		let nb_bits = self.code_bits[index];
		if nb_bits == 0 {
			return Err(AtexError::InvalidCode);
		}
		let entry = u32::from(self.symbol_value_offset[index])
			.wrapping_sub((word - self.code_comp[index]) >> (32 - nb_bits));
		let symbol = self
			.symbol_value
			.get(entry as usize)
			.copied()
			.ok_or(AtexError::InvalidCode)?;

		reader.drop_bits(nb_bits)?;
		Ok(symbol)
	}
}

/// Prepends `symbol` to the list of symbols with code length `bits`.
fn insert_seed(
	bits: u8,
	symbol: u16,
	working_bit_tab: &mut [u16; MAX_CODE_BITS_LENGTH],
	working_code_tab: &mut [u16; MAX_SYMBOL_VALUE],
) {
	debug_assert!((bits as usize) < MAX_CODE_BITS_LENGTH);
	debug_assert!((symbol as usize) < MAX_SYMBOL_VALUE);

	if working_bit_tab[bits as usize] == SENTINEL {
		working_bit_tab[bits as usize] = symbol;
	} else {
		working_code_tab[symbol as usize] = working_bit_tab[bits as usize];
		working_bit_tab[bits as usize] = symbol;
	}
}
