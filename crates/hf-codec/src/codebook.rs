//! Codebook header: the serialized code table at the front of an artifact.
//!
//! Layout, one entry per symbol followed by the sentinel:
//!
//! ```text
//! <symbol>~=<code>><  <symbol>~=<code>><  ...  \n$\n
//! ```
//!
//! (shown with spaces for readability; entries are written back to back).
//! The parser is positional: it reads exactly one code point as the symbol
//! and then only `0`/`1` digits as the code, so symbols equal to delimiter
//! characters are unambiguous. A `\n` symbol is told apart from the
//! sentinel by the byte after it (`~` versus `$`).

use crate::code::{Code, CodeTable, DecodeTable};
use crate::error::{HuffError, Result};
use crate::utf8::Utf8Reader;
use std::io::{BufRead, Write};

pub const FIELD_DELIMITER: &[u8; 2] = b"~=";
pub const ENTRY_DELIMITER: &[u8; 2] = b"><";
pub const SENTINEL: &[u8; 3] = b"\n$\n";

/// Write the header for `table`. Returns the number of bytes written.
pub fn write_header<W: Write>(table: &CodeTable, writer: &mut W) -> Result<u64> {
    let mut written = 0u64;
    let mut utf8 = [0u8; 4];
    for (symbol, code) in table.iter() {
        let symbol_bytes = symbol.encode_utf8(&mut utf8).as_bytes();
        writer.write_all(symbol_bytes)?;
        writer.write_all(FIELD_DELIMITER)?;
        let digits = code.to_string();
        writer.write_all(digits.as_bytes())?;
        writer.write_all(ENTRY_DELIMITER)?;
        written += (symbol_bytes.len() + FIELD_DELIMITER.len() + digits.len() + ENTRY_DELIMITER.len()) as u64;
    }
    writer.write_all(SENTINEL)?;
    Ok(written + SENTINEL.len() as u64)
}

pub fn encode_header(table: &CodeTable) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_header(table, &mut bytes)?;
    Ok(bytes)
}

/// Parse a header up to and including the sentinel.
///
/// On return `reader` is positioned at the first body byte and
/// `reader.offset()` is the header length.
pub fn read_header<R: BufRead>(reader: &mut Utf8Reader<R>) -> Result<DecodeTable> {
    let mut table = DecodeTable::new();
    loop {
        let entry_start = reader.offset();
        let symbol = reader.read_char()?.ok_or(HuffError::MissingSentinel)?;
        let next = reader.read_byte()?.ok_or(HuffError::MissingSentinel)?;

        if symbol == '\n' && next == SENTINEL[1] {
            expect_byte(reader, SENTINEL[2], "sentinel")?;
            break;
        }
        if next != FIELD_DELIMITER[0] {
            return Err(malformed(reader.offset() - 1, "expected field delimiter"));
        }
        expect_byte(reader, FIELD_DELIMITER[1], "field delimiter")?;

        let code = read_code(reader)?;
        if code.is_empty() {
            return Err(malformed(entry_start, format!("empty code for symbol {symbol:?}")));
        }
        table.insert(code, symbol)?;
    }

    if !table.is_prefix_free() {
        return Err(malformed(reader.offset(), "codes are not prefix-free"));
    }
    tracing::debug!(entries = table.len(), header_bytes = reader.offset(), "codebook header parsed");
    Ok(table)
}

/// Read `0`/`1` digits up to the entry delimiter.
fn read_code<R: BufRead>(reader: &mut Utf8Reader<R>) -> Result<Code> {
    let mut code = Code::new();
    loop {
        match reader.read_byte()?.ok_or(HuffError::MissingSentinel)? {
            b'0' => code.push(false),
            b'1' => code.push(true),
            b if b == ENTRY_DELIMITER[0] => {
                expect_byte(reader, ENTRY_DELIMITER[1], "entry delimiter")?;
                return Ok(code);
            }
            b => {
                return Err(malformed(
                    reader.offset() - 1,
                    format!("unexpected byte {b:#04x} in code"),
                ))
            }
        }
    }
}

fn expect_byte<R: BufRead>(reader: &mut Utf8Reader<R>, expected: u8, what: &str) -> Result<()> {
    match reader.read_byte()? {
        Some(b) if b == expected => Ok(()),
        Some(_) => Err(malformed(reader.offset() - 1, format!("incomplete {what}"))),
        None => Err(HuffError::MissingSentinel),
    }
}

fn malformed(offset: u64, reason: impl Into<String>) -> HuffError {
    HuffError::MalformedHeader { offset, reason: reason.into() }
}
