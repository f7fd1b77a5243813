//! Huffman prefix-code construction over weighted bit-string symbols.
//!
//! A code is rebuilt from scratch for every symbol transferred, so the
//! builder favors simplicity and a fully deterministic merge order over raw
//! speed. Determinism matters more than in an ordinary Huffman coder: the
//! code table is never transmitted, and the decoder reconstructs the exact
//! table the encoder used at the same step from shared model state alone.
//! Any ambiguity in tie-breaking would silently desynchronize the endpoints.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::channel::BitRead;
use crate::error::{Error, Result};
use crate::Bits;

/// A node of the code tree: either an alphabet symbol or a merged pair.
///
/// Merged nodes exclusively own their children; trees are built once,
/// queried, and discarded, never mutated or shared.
#[derive(Debug, Clone)]
pub enum SymbolNode {
    /// An alphabet symbol with its (relative) weight.
    Leaf {
        /// The plaintext bit-string this symbol stands for.
        value: Bits,
        /// Relative weight; only the ordering of weights matters.
        weight: f64,
    },
    /// Two merged nodes. The left child is reached by a `0` codeword bit,
    /// the right child by a `1`.
    Merged {
        /// Sum of the children's weights.
        weight: f64,
        left: Box<SymbolNode>,
        right: Box<SymbolNode>,
    },
}

impl SymbolNode {
    /// Creates a leaf for an alphabet symbol.
    pub fn leaf(value: Bits, weight: f64) -> Self {
        SymbolNode::Leaf { value, weight }
    }

    /// Merges two nodes into a parent weighing the sum of both.
    fn merged(left: SymbolNode, right: SymbolNode) -> Self {
        SymbolNode::Merged {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the weight of the node.
    pub fn weight(&self) -> f64 {
        match self {
            SymbolNode::Leaf { weight, .. } => *weight,
            SymbolNode::Merged { weight, .. } => *weight,
        }
    }

    /// Walks the subtree, recording the codeword assigned to every leaf.
    ///
    /// A tree consisting of a single leaf gets the one-bit code `0`.
    fn collect_codes(&self, prefix: Bits, table: &mut HashMap<Bits, Bits>) {
        match self {
            SymbolNode::Leaf { value, .. } => {
                let code = if prefix.is_empty() {
                    bitvec![u8, Msb0; 0]
                } else {
                    prefix
                };
                table.insert(value.clone(), code);
            }
            SymbolNode::Merged { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(false);
                left.collect_codes(left_prefix, table);
                let mut right_prefix = prefix;
                right_prefix.push(true);
                right.collect_codes(right_prefix, table);
            }
        }
    }
}

/// A prefix code over a weighted alphabet, usable for one step in each
/// direction: table lookup for encoding, tree descent for decoding.
#[derive(Debug)]
pub struct HuffmanCode {
    root: SymbolNode,
    table: HashMap<Bits, Bits>,
}

impl HuffmanCode {
    /// Builds the code for a weighted alphabet.
    ///
    /// The working set is stable-sorted by ascending weight, the two
    /// lightest nodes are merged (first as the `0` child), and the merged
    /// node is reinserted at the front. Equal-weight symbols therefore keep
    /// the order in which the alphabet produced them, and a fresh merged
    /// node outranks equal-weight survivors. Encoder and decoder run this
    /// identical rule, which is what keeps their tables in lockstep.
    pub fn build(mut nodes: Vec<SymbolNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::InvalidParameter(
                "alphabet must be non-empty".to_string(),
            ));
        }
        while nodes.len() > 1 {
            nodes.sort_by(|a, b| a.weight().total_cmp(&b.weight()));
            let left = nodes.remove(0);
            let right = nodes.remove(0);
            nodes.insert(0, SymbolNode::merged(left, right));
        }
        let root = nodes.remove(0);
        let mut table = HashMap::new();
        root.collect_codes(Bits::new(), &mut table);
        Ok(HuffmanCode { root, table })
    }

    /// Reads one symbol's worth of plaintext bits from `input` and returns
    /// the bits read together with the codeword assigned to them.
    ///
    /// Bits are pulled one at a time until the accumulated candidate is a
    /// table key. The run-length alphabet guarantees a match within the
    /// channel's remaining budget, so a well-configured encode never
    /// underruns; an underrun here means the alphabet and budget disagree.
    pub fn encode<R: BitRead + ?Sized>(&self, input: &mut R) -> Result<(Bits, &BitSlice<u8, Msb0>)> {
        let mut symbol = Bits::new();
        loop {
            if let Some(code) = self.table.get(symbol.as_bitslice()) {
                return Ok((symbol, code.as_bitslice()));
            }
            let bit = input.read_bits(1)?;
            symbol.push(bit[0]);
        }
    }

    /// Reads codeword bits from `input`, descending the tree until a leaf
    /// is reached, and returns the leaf's plaintext bit-string.
    pub fn decode<R: BitRead + ?Sized>(&self, input: &mut R) -> Result<&BitSlice<u8, Msb0>> {
        let mut node = &self.root;
        loop {
            match node {
                SymbolNode::Leaf { value, .. } => return Ok(value.as_bitslice()),
                SymbolNode::Merged { left, right, .. } => {
                    let bit = input.read_bits(1)?;
                    node = if bit[0] { right } else { left };
                }
            }
        }
    }

    /// Returns the codeword assigned to a symbol value, if present.
    pub fn codeword(&self, value: &BitSlice<u8, Msb0>) -> Option<&BitSlice<u8, Msb0>> {
        self.table.get(value).map(Bits::as_bitslice)
    }

    /// Number of symbols in the code table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the code table is empty. Never true for a built code.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{BitWrite, BoundedBitReader, BoundedBitWriter};
    use std::io::Cursor;

    fn bits_of(s: &str) -> Bits {
        s.chars().map(|c| c == '1').collect()
    }

    fn symbol(value: &str, weight: f64) -> SymbolNode {
        SymbolNode::leaf(bits_of(value), weight)
    }

    /// Packs a plaintext bit-string into bytes and wraps it in a bounded
    /// reader with exactly that many bits of budget.
    fn reader_over(s: &str) -> BoundedBitReader<Cursor<Vec<u8>>> {
        let mut writer = BoundedBitWriter::new(Vec::new(), s.len() as u64);
        writer.write_bits(&bits_of(s)).unwrap();
        let bytes = writer.finish().unwrap();
        BoundedBitReader::new(Cursor::new(bytes), s.len() as u64)
    }

    #[test]
    fn build_rejects_empty_alphabet() {
        assert!(matches!(
            HuffmanCode::build(Vec::new()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn single_symbol_gets_code_zero() {
        let code = HuffmanCode::build(vec![symbol("101", 1.0)]).unwrap();
        assert_eq!(
            code.codeword(&bits_of("101")).unwrap(),
            bits_of("0").as_bitslice()
        );
    }

    #[test]
    fn lighter_symbols_get_longer_codes() {
        let code = HuffmanCode::build(vec![
            symbol("0", 0.9),
            symbol("1", 0.07),
            symbol("01", 0.03),
        ])
        .unwrap();
        let heavy = code.codeword(&bits_of("0")).unwrap().len();
        let light = code.codeword(&bits_of("01")).unwrap().len();
        assert!(heavy < light);
    }

    #[test]
    fn codes_are_prefix_free() {
        let code = HuffmanCode::build(vec![
            symbol("000", 0.5),
            symbol("1", 0.3),
            symbol("01", 0.15),
            symbol("001", 0.05),
        ])
        .unwrap();
        let words: Vec<Bits> = ["000", "1", "01", "001"]
            .iter()
            .map(|v| code.codeword(&bits_of(v)).unwrap().to_bitvec())
            .collect();
        for (i, a) in words.iter().enumerate() {
            for (j, b) in words.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "codeword {a:?} is a prefix of {b:?}");
                }
            }
        }
    }

    #[test]
    fn build_is_deterministic_under_ties() {
        let alphabet = || {
            vec![
                symbol("00", 0.25),
                symbol("1", 0.25),
                symbol("01", 0.25),
                symbol("10", 0.25),
            ]
        };
        let a = HuffmanCode::build(alphabet()).unwrap();
        let b = HuffmanCode::build(alphabet()).unwrap();
        for value in ["00", "1", "01", "10"] {
            assert_eq!(
                a.codeword(&bits_of(value)).unwrap(),
                b.codeword(&bits_of(value)).unwrap()
            );
        }
    }

    #[test]
    fn encode_returns_first_exact_match() {
        // "00" is deliberately a prefix of "001": encode must stop at "00".
        let code = HuffmanCode::build(vec![
            symbol("00", 0.5),
            symbol("1", 0.3),
            symbol("01", 0.15),
            symbol("001", 0.05),
        ])
        .unwrap();
        let mut input = reader_over("0010");
        let (value, _) = code.encode(&mut input).unwrap();
        assert_eq!(value, bits_of("00"));
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn decode_inverts_encode() {
        let code = HuffmanCode::build(vec![
            symbol("000", 0.5),
            symbol("1", 0.3),
            symbol("01", 0.15),
            symbol("001", 0.05),
        ])
        .unwrap();
        for value in ["000", "1", "01", "001"] {
            let codeword = code.codeword(&bits_of(value)).unwrap().to_bitvec();
            let mut writer = BoundedBitWriter::new(Vec::new(), codeword.len() as u64);
            writer.write_bits(&codeword).unwrap();
            let mut input =
                BoundedBitReader::new(Cursor::new(writer.finish().unwrap()), codeword.len() as u64);
            assert_eq!(code.decode(&mut input).unwrap(), bits_of(value).as_bitslice());
        }
    }

    #[test]
    fn encode_underruns_on_exhausted_channel() {
        let code = HuffmanCode::build(vec![symbol("00", 0.5), symbol("11", 0.5)]).unwrap();
        let mut input = reader_over("0");
        assert!(matches!(
            code.encode(&mut input),
            Err(Error::Underrun { .. })
        ));
    }
}
