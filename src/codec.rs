//! The compress/decompress loop.
//!
//! One [`Codec`] instance is bound to one probability model and drives one
//! stream pair end to end, one symbol per step. Every step rebuilds the
//! run-length alphabet and its Huffman code from the model's current
//! prediction and the remaining bit budget, transfers exactly one symbol,
//! and then feeds that symbol back into the model.
//!
//! No code table ever crosses the wire. The decoder reconstructs the exact
//! table the encoder used at the same step, which holds as long as both
//! endpoints start from the same model configuration and the same bit
//! budget: the compressor observes each symbol as it is read, the
//! decompressor observes each symbol as it is written, and both are the
//! same plaintext bits. Observation is sequenced strictly before the next
//! rebuild; the model state feeding step `k + 1` always includes the symbol
//! of step `k` on both sides.

use log::{debug, trace};

use crate::alphabet::{optimal_run_length, run_length_alphabet};
use crate::channel::{BitRead, BitWrite};
use crate::error::Result;
use crate::huffman::HuffmanCode;
use crate::model::ProbabilityModel;

/// Symmetric entropy coder over a probability model.
pub struct Codec<M> {
    model: M,
}

impl<M: ProbabilityModel> Codec<M> {
    /// Creates a codec bound to one model instance.
    pub fn new(model: M) -> Self {
        Codec { model }
    }

    /// Consumes the codec, returning the model and its accumulated state.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Builds the code for the current step from the model's prediction and
    /// the remaining plaintext bit budget.
    fn rebuild(&self, remaining: u64) -> Result<HuffmanCode> {
        let p = self.model.predictive_one();
        let run_length = optimal_run_length(p).min(remaining);
        HuffmanCode::build(run_length_alphabet(p, run_length))
    }

    /// Compresses exactly `input.remaining()` plaintext bits into `output`.
    ///
    /// The caller is responsible for the out-of-band agreement: the
    /// decompressing endpoint must be configured with the same model
    /// parameters and the same plaintext bit budget, or its output is
    /// undefined.
    pub fn compress<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BitRead + ?Sized,
        W: BitWrite + ?Sized,
    {
        let budget = input.remaining();
        let mut steps = 0u64;
        while input.remaining() > 0 {
            let code = self.rebuild(input.remaining())?;
            let (symbol, codeword) = code.encode(input)?;
            output.write_bits(codeword)?;
            trace!(
                "compress step {}: {} plaintext bits -> {} code bits, {} bits left",
                steps,
                symbol.len(),
                codeword.len(),
                input.remaining()
            );
            self.model.observe(&symbol);
            steps += 1;
        }
        debug!("compressed {} bits in {} symbols", budget, steps);
        Ok(())
    }

    /// Decompresses from `input` until exactly `output.remaining()`
    /// plaintext bits have been produced.
    ///
    /// A mismatched budget or model configuration between the two endpoints
    /// is not detectable here; it manifests as a budget underrun on `input`
    /// or as silently wrong output.
    pub fn decompress<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BitRead + ?Sized,
        W: BitWrite + ?Sized,
    {
        let budget = output.remaining();
        let mut steps = 0u64;
        while output.remaining() > 0 {
            let code = self.rebuild(output.remaining())?;
            let symbol = code.decode(input)?.to_bitvec();
            output.write_bits(&symbol)?;
            trace!(
                "decompress step {}: {} plaintext bits, {} bits left",
                steps,
                symbol.len(),
                output.remaining()
            );
            self.model.observe(&symbol);
            steps += 1;
        }
        debug!("decompressed {} bits in {} symbols", budget, steps);
        Ok(())
    }
}
