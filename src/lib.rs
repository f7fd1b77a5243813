//! Adaptive run-length Huffman coding for skewed binary streams.
//!
//! This crate compresses bit streams that are mostly one value (typically
//! zero) by Huffman-coding run-length symbols whose weights come from a
//! probability model, which is either fixed up front or updated online from
//! the bits already seen. The code is rebuilt for every symbol and never
//! transmitted: encoder and decoder stay synchronized purely by observing
//! the same plaintext bits, so the wire format is a raw, unframed sequence
//! of codewords.
//!
//! The total plaintext bit count is agreed out-of-band and must be
//! identical on both endpoints, as must the model configuration.
//!
//! # Examples
//!
//! ```rust
//! use std::io::Cursor;
//! use arhc::{AdaptiveModel, BoundedBitReader, BoundedBitWriter, Codec};
//!
//! # fn main() -> arhc::Result<()> {
//! let plaintext = vec![0b0000_0100u8, 0b0010_0000];
//! let n = 16; // bit budget, agreed out-of-band
//!
//! let mut input = BoundedBitReader::new(Cursor::new(plaintext.clone()), n);
//! let mut output = BoundedBitWriter::new(Vec::new(), n);
//! Codec::new(AdaptiveModel::new(0.5, 0.5)?).compress(&mut input, &mut output)?;
//! let compressed_bits = output.bits_written();
//! let compressed = output.finish()?;
//!
//! // The decompressing endpoint rebuilds every code from scratch; it only
//! // needs the same model parameters and the same budget.
//! let mut input = BoundedBitReader::new(Cursor::new(compressed), compressed_bits);
//! let mut output = BoundedBitWriter::new(Vec::new(), n);
//! Codec::new(AdaptiveModel::new(0.5, 0.5)?).decompress(&mut input, &mut output)?;
//! assert_eq!(output.finish()?, plaintext);
//! # Ok(())
//! # }
//! ```

pub mod alphabet;
pub mod channel;
pub mod codec;
pub mod error;
pub mod huffman;
pub mod model;

pub use channel::{BitRead, BitWrite, BoundedBitReader, BoundedBitWriter};
pub use codec::Codec;
pub use error::{Error, Result};
pub use huffman::{HuffmanCode, SymbolNode};
pub use model::{AdaptiveModel, ConstantModel, ProbabilityModel};

/// Bit-string type used throughout the crate: plaintext symbol values,
/// codewords, and channel chunks, always most-significant-bit first.
pub type Bits = bitvec::vec::BitVec<u8, bitvec::order::Msb0>;
