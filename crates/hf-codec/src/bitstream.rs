//! Body packing: variable-length codes in, 7-bit units out, and back.
//!
//! Every unit except the last carries exactly [`GROUP_WIDTH`] bits in its
//! low bits. The last unit carries the 1..=7 leftover bits behind a single
//! leading marker bit, so a reader recovers the residual width (leading
//! zeros included) from the unit value alone. The body has no length field;
//! the reader learns which unit is last from the artifact size.

use crate::code::{Code, DecodeTable};
use crate::error::{HuffError, Result};
use bitvec::prelude::*;
use std::io::{Read, Write};

/// Bits per full unit.
pub const GROUP_WIDTH: u32 = 7;

const GROUP_MASK: u8 = (1 << GROUP_WIDTH) - 1;

/// Unit and bit counts of a written body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyStats {
    pub units: u64,
    pub bits: u64,
}

pub struct BitWriter<W> {
    inner: W,
    pending: BitVec<u8, Msb0>,
    stats: BodyStats,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, pending: BitVec::new(), stats: BodyStats::default() }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.pending.push(bit);
        self.stats.bits += 1;
        self.flush_full_units()
    }

    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        self.pending.extend_from_bitslice(code.bits());
        self.stats.bits += code.len() as u64;
        self.flush_full_units()
    }

    // A full group is only emitted once a later bit exists, so the residual
    // left for `finish` always holds 1..=7 bits.
    fn flush_full_units(&mut self) -> Result<()> {
        let width = GROUP_WIDTH as usize;
        let mut start = 0;
        while self.pending.len() - start > width {
            let unit = self.pending[start..start + width].load_be::<u8>();
            self.inner.write_all(&[unit])?;
            self.stats.units += 1;
            start += width;
        }
        if start > 0 {
            self.pending = self.pending.split_off(start);
        }
        Ok(())
    }

    /// Emit the marked residual unit, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<(W, BodyStats)> {
        if !self.pending.is_empty() {
            let marker = 1u8 << self.pending.len();
            let unit = marker | self.pending.load_be::<u8>();
            self.inner.write_all(&[unit])?;
            self.stats.units += 1;
        }
        self.inner.flush()?;
        Ok((self.inner, self.stats))
    }
}

/// Bits carried by one body unit, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    value: u8,
    width: u32,
}

impl Unit {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        let skip = (u8::BITS - self.width) as usize;
        self.value.view_bits::<Msb0>()[skip..].iter().by_vals()
    }
}

pub struct BitReader<R> {
    inner: R,
    offset: u64,
    end: u64,
}

impl<R: Read> BitReader<R> {
    /// `offset` is the artifact position of the first body byte and `end`
    /// the total artifact size; both only serve to find the last unit and to
    /// report error positions.
    pub fn new(inner: R, offset: u64, end: u64) -> Self {
        Self { inner, offset, end: end.max(offset) }
    }

    pub fn next_unit(&mut self) -> Result<Option<Unit>> {
        if self.offset >= self.end {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte)?;
        let (value, at) = (byte[0], self.offset);
        self.offset += 1;

        if self.offset < self.end {
            if value > GROUP_MASK {
                return Err(HuffError::CorruptBody { offset: at, value });
            }
            return Ok(Some(Unit { value, width: GROUP_WIDTH }));
        }

        // last unit: everything below the marker bit
        let view = value.view_bits::<Msb0>();
        let marker = match view.first_one() {
            Some(marker) if marker < GROUP_WIDTH as usize => marker,
            _ => return Err(HuffError::CorruptBody { offset: at, value }),
        };
        let residual = &view[marker + 1..];
        Ok(Some(Unit { value: residual.load_be::<u8>(), width: residual.len() as u32 }))
    }
}

/// Greedy left-to-right matcher over a prefix-free decode table.
pub struct PrefixDecoder<'a> {
    table: &'a DecodeTable,
    pending: Code,
}

impl<'a> PrefixDecoder<'a> {
    pub fn new(table: &'a DecodeTable) -> Self {
        Self { table, pending: Code::new() }
    }

    /// Append one bit; yields a symbol once the pending bits form a code.
    pub fn push_bit(&mut self, bit: bool) -> Result<Option<char>> {
        self.pending.push(bit);
        if let Some(symbol) = self.table.get(&self.pending) {
            self.pending.clear();
            return Ok(Some(symbol));
        }
        if self.pending.len() >= self.table.max_code_len() {
            return Err(HuffError::UnresolvedBits { bits: self.pending.to_string() });
        }
        Ok(None)
    }

    /// Fail if bits are still waiting for a match.
    pub fn finish(self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(HuffError::UnresolvedBits { bits: self.pending.to_string() })
        }
    }
}

/// Decode a whole body into `out`. Returns the number of symbols written.
pub fn decode_body<R: Read, W: Write>(
    mut reader: BitReader<R>,
    table: &DecodeTable,
    out: &mut W,
) -> Result<u64> {
    let mut decoder = PrefixDecoder::new(table);
    let mut utf8 = [0u8; 4];
    let mut symbols = 0u64;
    while let Some(unit) = reader.next_unit()? {
        for bit in unit.bits() {
            if let Some(symbol) = decoder.push_bit(bit)? {
                out.write_all(symbol.encode_utf8(&mut utf8).as_bytes())?;
                symbols += 1;
            }
        }
    }
    decoder.finish()?;
    Ok(symbols)
}
