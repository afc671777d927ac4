//! Bit-level append/read buffer (`spec.md` §4.C1).
//!
//! Bits are written and read MSB-first; packing to bytes zero-pads the
//! final byte's low-order bits. Built on `bit_vec::BitVec`, already a
//! dependency of the teacher crate.

use crate::error::Error;
use bit_vec::BitVec;

/// Append-only bit sink.
#[derive(Default)]
pub struct BitWriter {
    bits: BitVec,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { bits: BitVec::new() }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn push_bits(&mut self, bits: &[bool]) {
        for &b in bits {
            self.bits.push(b);
        }
    }

    /// Pack to bytes MSB-first, zero-padding the last byte, and return the
    /// logical bit length alongside it (the padding is not recoverable from
    /// the bytes alone, see `spec.md` §9).
    pub fn into_bytes(self) -> (Vec<u8>, usize) {
        let bit_len = self.bits.len();
        (self.bits.to_bytes(), bit_len)
    }
}

/// Cursor-based bit reader over a known logical bit length.
pub struct BitReader<'a> {
    bits: &'a BitVec,
    bit_len: usize,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a BitVec, bit_len: usize) -> Self {
        Self { bits, bit_len, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bit_len - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bit_len
    }

    /// Read `n` bits, advancing the cursor.
    pub fn read_bits(&mut self, n: usize) -> Result<Vec<bool>, Error> {
        let bits = self.peek_bits(n)?;
        self.pos += n;
        Ok(bits)
    }

    /// Read `n` bits without advancing the cursor.
    pub fn peek_bits(&self, n: usize) -> Result<Vec<bool>, Error> {
        if self.pos + n > self.bit_len {
            return Err(Error::TruncatedStream);
        }
        Ok((0..n).map(|i| self.bits.get(self.pos + i).unwrap_or(false)).collect())
    }

    pub fn read_bit(&mut self) -> Result<bool, Error> {
        Ok(self.read_bits(1)?[0])
    }
}
