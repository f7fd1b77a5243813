//! Bounded bit channels over byte-oriented I/O.
//!
//! The codec works bit by bit but the outside world speaks bytes. The
//! channels here pack and unpack bits MSB-first and, crucially, carry the
//! bit budget `N` the two endpoints agreed on out-of-band: the compressed
//! stream has no framing of any kind, so the budget is the only thing that
//! tells either side when to stop.
//!
//! Each channel owns its own budget and transfer counter; nothing is shared
//! between instances. An optional observer callback is invoked with every
//! chunk transferred, which callers can use for statistics or tracing.

use std::io::{Read, Write};

use bitvec::prelude::*;

use crate::error::{Error, Result};
use crate::Bits;

/// Observer invoked with every chunk of bits a channel transfers.
pub type Observer = Box<dyn FnMut(&BitSlice<u8, Msb0>)>;

/// A source of bits with a fixed total budget.
pub trait BitRead {
    /// Reads exactly `n` bits, or fails.
    ///
    /// Fails with [`Error::Underrun`] if fewer than `n` bits remain in the
    /// budget, and with [`Error::Io`] if the backing stream ends early.
    fn read_bits(&mut self, n: usize) -> Result<Bits>;

    /// Number of bits still available under the budget.
    fn remaining(&self) -> u64;
}

/// A sink for bits with a fixed total budget.
pub trait BitWrite {
    /// Writes all of `bits` to the channel.
    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()>;

    /// Number of bits the budget still expects to be written.
    fn remaining(&self) -> u64;
}

/// Reads bits MSB-first from a byte stream, bounded to `budget` bits total.
pub struct BoundedBitReader<R: Read> {
    inner: R,
    budget: u64,
    transferred: u64,
    current_byte: u8,
    bits_left: u8,
    observer: Option<Observer>,
}

impl<R: Read> BoundedBitReader<R> {
    /// Wraps a byte stream with a total budget of `budget` bits.
    pub fn new(inner: R, budget: u64) -> Self {
        BoundedBitReader {
            inner,
            budget,
            transferred: 0,
            current_byte: 0,
            bits_left: 0,
            observer: None,
        }
    }

    /// Registers a callback invoked with every chunk of bits read.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&BitSlice<u8, Msb0>) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Total bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.transferred
    }

    fn next_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            let mut byte = [0u8; 1];
            self.inner.read_exact(&mut byte)?;
            self.current_byte = byte[0];
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Ok((self.current_byte >> self.bits_left) & 1 == 1)
    }
}

impl<R: Read> BitRead for BoundedBitReader<R> {
    fn read_bits(&mut self, n: usize) -> Result<Bits> {
        if n as u64 > self.remaining() {
            return Err(Error::Underrun {
                requested: n as u64,
                remaining: self.remaining(),
            });
        }
        let mut chunk = Bits::with_capacity(n);
        for _ in 0..n {
            chunk.push(self.next_bit()?);
        }
        self.transferred += n as u64;
        if let Some(observer) = self.observer.as_mut() {
            observer(&chunk);
        }
        Ok(chunk)
    }

    fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.transferred)
    }
}

/// Writes bits MSB-first into a byte stream, tracking a budget of `budget`
/// bits.
///
/// Writing is never refused: the budget only drives [`BitWrite::remaining`],
/// which the decompression loop uses as its termination condition.
pub struct BoundedBitWriter<W: Write> {
    inner: W,
    budget: u64,
    transferred: u64,
    current_byte: u8,
    bits_filled: u8,
    observer: Option<Observer>,
}

impl<W: Write> BoundedBitWriter<W> {
    /// Wraps a byte sink with a total budget of `budget` bits.
    pub fn new(inner: W, budget: u64) -> Self {
        BoundedBitWriter {
            inner,
            budget,
            transferred: 0,
            current_byte: 0,
            bits_filled: 0,
            observer: None,
        }
    }

    /// Registers a callback invoked with every chunk of bits written.
    pub fn set_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&BitSlice<u8, Msb0>) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Total bits written so far, excluding any final padding.
    pub fn bits_written(&self) -> u64 {
        self.transferred
    }

    /// Pads the trailing partial byte with zeros, flushes, and returns the
    /// underlying sink. Padding bits are neither counted nor observed.
    pub fn finish(mut self) -> Result<W> {
        if self.bits_filled > 0 {
            let byte = self.current_byte << (8 - self.bits_filled);
            self.inner.write_all(&[byte])?;
            self.bits_filled = 0;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitWrite for BoundedBitWriter<W> {
    fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.current_byte = (self.current_byte << 1) | u8::from(bit);
            self.bits_filled += 1;
            if self.bits_filled == 8 {
                self.inner.write_all(&[self.current_byte])?;
                self.current_byte = 0;
                self.bits_filled = 0;
            }
        }
        self.transferred += bits.len() as u64;
        if let Some(observer) = self.observer.as_mut() {
            observer(bits);
        }
        Ok(())
    }

    fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.transferred)
    }
}
