//! MSB-first bit streams over byte sinks and sources.
//!
//! `BitWriter` packs single bits into bytes and pads the last partial byte
//! with zeros on `close`. `BitReader` hands bits back in the same order and
//! keeps a one byte lookahead so that byte reads can start mid-byte.

use bitvec::prelude::*;
use std::io::{self, Read, Write};

use crate::error::Result;

/// Value handed out for every read past the end of the source.
const FILLER: u8 = 0xff;

#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    buffer: u8,
    n: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: 0,
            n: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer <<= 1;
        if bit {
            self.buffer |= 1;
        }
        self.n += 1;
        self.bits_written += 1;
        if self.n == 8 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Writes `byte` MSB first. Goes straight to the sink when the stream is
    /// byte aligned.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        if self.n == 0 {
            self.inner.write_all(&[byte])?;
            self.bits_written += 8;
            return Ok(());
        }

        for i in (0..8).rev() {
            self.write_bit((byte >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Big-endian.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        for byte in value.to_be_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of bits written so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the pending bits with zeros, writes them out and flushes the
    /// sink. Consuming `self` means a writer can only be closed once.
    pub fn close(mut self) -> Result<W> {
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if self.n == 0 {
            return Ok(());
        }
        self.buffer <<= 8 - self.n;
        self.inner.write_all(&[self.buffer])?;
        self.buffer = 0;
        self.n = 0;
        Ok(())
    }
}

#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    buffer: u8,
    // unconsumed bits left in `buffer`, 1..=8 while the source has data
    n: u8,
    exhausted: bool,
    overran: bool,
}

impl<R: Read> BitReader<R> {
    /// Primes the lookahead byte, so this already reads from `inner`.
    pub fn new(inner: R) -> Result<Self> {
        let mut reader = Self {
            inner,
            buffer: 0,
            n: 0,
            exhausted: false,
            overran: false,
        };
        reader.fill()?;
        Ok(reader)
    }

    /// Past the end of the source this returns `true` and sets `overran`.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.exhausted {
            self.overran = true;
            return Ok(true);
        }

        self.n -= 1;
        let bit = (self.buffer >> self.n) & 1 == 1;
        if self.n == 0 {
            self.fill()?;
        }
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        if self.exhausted {
            self.overran = true;
            return Ok(FILLER);
        }

        if self.n == 8 {
            let byte = self.buffer;
            self.fill()?;
            return Ok(byte);
        }

        // tail of the current byte, then the head of the next one
        let n = self.n;
        let head = self.buffer << (8 - n);
        self.fill()?;
        if self.exhausted {
            self.overran = true;
            return Ok(head | (FILLER >> n));
        }
        self.n = n;
        Ok(head | (self.buffer >> n))
    }

    /// Big-endian.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn is_aligned(&self) -> bool {
        self.exhausted || self.n == 8
    }

    /// The source has no more bytes. Real bits may still have been returned
    /// up to this point.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// At least one filler bit was returned, i.e. a caller read past the end.
    pub fn overran(&self) -> bool {
        self.overran
    }

    pub fn close(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.buffer = FILLER;
                    self.n = 8;
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(_) => {
                    self.buffer = byte[0];
                    self.n = 8;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
