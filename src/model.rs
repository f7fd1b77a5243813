//! Probability models for the bit source.
//!
//! The codec compresses a stream of statistically skewed bits and needs a
//! running estimate of the probability that the next bit is a one. Two models
//! are provided:
//! - [`ConstantModel`]: a fixed belief, configured up front and never updated
//! - [`AdaptiveModel`]: a Beta-Bernoulli conjugate model that updates its
//!   belief online from the bits already seen
//!
//! The encoder and decoder each hold their own model instance. As long as both
//! are constructed with identical parameters and fed identical bit histories,
//! their predictions agree at every step, which is what keeps the two
//! endpoints synchronized without any side channel.

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// A belief about the distribution of bits in the stream.
///
/// `observe` is called with every chunk of plaintext bits transferred;
/// `predictive_one` is consulted before each symbol to parameterize the
/// run-length alphabet.
pub trait ProbabilityModel {
    /// Update the belief with a chunk of observed plaintext bits.
    fn observe(&mut self, bits: &BitSlice<u8, Msb0>);

    /// Current estimate of the probability that the next bit is a one.
    ///
    /// Always strictly inside `(0, 1)`.
    fn predictive_one(&self) -> f64;
}

/// A fixed probability of one, immutable for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct ConstantModel {
    prob1: f64,
}

impl ConstantModel {
    /// Creates a constant model.
    ///
    /// Fails if `prob1` is not strictly between 0 and 1.
    pub fn new(prob1: f64) -> Result<Self> {
        if !prob1.is_finite() || prob1 <= 0.0 || prob1 >= 1.0 {
            return Err(Error::InvalidParameter(format!(
                "prob1 must lie in (0, 1), got {prob1}"
            )));
        }
        Ok(ConstantModel { prob1 })
    }
}

impl Default for ConstantModel {
    /// The conventional default for heavily skewed streams: `prob1 = 0.01`.
    fn default() -> Self {
        ConstantModel { prob1: 0.01 }
    }
}

impl ProbabilityModel for ConstantModel {
    fn observe(&mut self, _bits: &BitSlice<u8, Msb0>) {}

    fn predictive_one(&self) -> f64 {
        self.prob1
    }
}

/// An online Bayesian estimate of the probability of one.
///
/// The belief is `p ~ Beta(alpha0, alpha1)` updated with a Bernoulli
/// likelihood: each observed zero increments `alpha0`, each observed one
/// increments `alpha1`, and the predictive probability is the posterior mean
/// `alpha1 / (alpha0 + alpha1)`.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveModel {
    /// Pseudo-count associated with zero bits (prior plus observations).
    alpha0: f64,
    /// Pseudo-count associated with one bits (prior plus observations).
    alpha1: f64,
}

impl AdaptiveModel {
    /// Creates an adaptive model from prior pseudo-counts.
    ///
    /// Fails unless both priors are strictly positive; positive priors keep
    /// the predictive probability defined (and inside `(0, 1)`) before any
    /// bit has been observed.
    pub fn new(alpha0: f64, alpha1: f64) -> Result<Self> {
        if !alpha0.is_finite() || alpha0 <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "alpha0 must be positive, got {alpha0}"
            )));
        }
        if !alpha1.is_finite() || alpha1 <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "alpha1 must be positive, got {alpha1}"
            )));
        }
        Ok(AdaptiveModel { alpha0, alpha1 })
    }
}

impl Default for AdaptiveModel {
    /// Jeffreys prior: `alpha0 = alpha1 = 0.5`.
    fn default() -> Self {
        AdaptiveModel {
            alpha0: 0.5,
            alpha1: 0.5,
        }
    }
}

impl ProbabilityModel for AdaptiveModel {
    fn observe(&mut self, bits: &BitSlice<u8, Msb0>) {
        let ones = bits.count_ones();
        let zeros = bits.len() - ones;
        self.alpha0 += zeros as f64;
        self.alpha1 += ones as f64;
    }

    fn predictive_one(&self) -> f64 {
        self.alpha1 / (self.alpha0 + self.alpha1)
    }
}
