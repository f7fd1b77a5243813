//! Run-length alphabet construction.
//!
//! The codec never codes single bits directly. Each step it turns the
//! model's current predictive probability into a small alphabet of
//! run-length symbols (a run of zeros, optionally terminated by a one) and
//! Huffman-codes exactly one of them. The alphabet is regenerated for every
//! symbol because the predictive probability and the remaining bit budget
//! both move as the stream is consumed.

use crate::huffman::SymbolNode;
use crate::Bits;

/// Run length at which the probability of an all-zero run first exceeds one
/// half, given probability `p` of a one bit.
///
/// This is the median-based parameter choice familiar from Golomb coding:
/// `round(ln 0.5 / ln(1 - p))`. The result is clamped to at least 1; for
/// `p` above roughly 0.75 the rounded value is 0, which would produce an
/// empty run symbol that consumes no input and stalls the codec loop.
pub fn optimal_run_length(p: f64) -> u64 {
    let length = (0.5f64.ln() / (1.0 - p).ln()).round();
    if length < 1.0 {
        1
    } else {
        length as u64
    }
}

/// Builds the weighted run-length alphabet for one coding step.
///
/// The alphabet contains, in this order:
/// - the uninterrupted run of `run_length` zeros, weight `(1-p)^run_length`;
/// - for each `i` in `0..=run_length`, a run of `i` zeros terminated by a
///   one, weight `(1-p)^i * p`.
///
/// Every bit-string of at most `run_length` zeros followed by a one, and
/// the plain `run_length`-zero run, appears exactly once, so an encoder
/// always finds a match within `run_length` bits. Symbol order is part of
/// the codec's wire behavior: the code builder breaks weight ties by this
/// production order.
///
/// The weights are relative, not a normalized distribution: the all-zero
/// run overlaps the longest terminated run, and the surplus mass is
/// harmless because Huffman construction only compares weights.
pub fn run_length_alphabet(p: f64, run_length: u64) -> Vec<SymbolNode> {
    let q = 1.0 - p;
    let mut symbols = Vec::with_capacity(run_length as usize + 2);

    let mut all_zeros = Bits::new();
    all_zeros.resize(run_length as usize, false);
    symbols.push(SymbolNode::leaf(all_zeros, q.powf(run_length as f64)));

    for i in 0..=run_length {
        let mut value = Bits::new();
        value.resize(i as usize, false);
        value.push(true);
        symbols.push(SymbolNode::leaf(value, q.powf(i as f64) * p));
    }

    symbols
}
