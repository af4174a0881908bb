//! Compression pipeline: frequencies → tree → codes → header → body, and
//! header → body on the way back.

use crate::bitstream::{decode_body, BitReader, BitWriter};
use crate::code::CodeTable;
use crate::codebook::{read_header, write_header};
use crate::config::HuffConfig;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::naming;
use crate::utf8::Utf8Reader;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sizes of one compressed artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub symbols: u64,
    pub distinct_symbols: usize,
    pub header_bytes: u64,
    pub body_units: u64,
    pub body_bits: u64,
}

impl CompressionStats {
    pub fn total_bytes(&self) -> u64 {
        self.header_bytes + self.body_units
    }

    /// Artifact size relative to the original input size.
    pub fn ratio(&self, original_bytes: u64) -> f64 {
        if original_bytes == 0 { return 1.0; }
        self.total_bytes() as f64 / original_bytes as f64
    }
}

/// The main Huffman pipeline.
#[derive(Debug, Clone, Default)]
pub struct HuffmanPipeline {
    config: HuffConfig,
}

impl HuffmanPipeline {
    pub fn new(config: HuffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HuffConfig {
        &self.config
    }

    /// Compress text held in memory.
    pub fn compress_str(&self, text: &str) -> Result<(Vec<u8>, CompressionStats)> {
        let mut artifact = Vec::new();
        let stats = self.compress_to(text, &mut artifact)?;
        Ok((artifact, stats))
    }

    pub fn compress_to<W: Write>(&self, text: &str, out: W) -> Result<CompressionStats> {
        let frequencies = FrequencyTable::from_text(text);
        let codes = CodeTable::from_frequencies(&frequencies)?;
        encode_symbols(&codes, &frequencies, text.chars().map(Ok), out)
    }

    /// Decompress an artifact held in memory.
    pub fn decompress_bytes(&self, artifact: &[u8]) -> Result<String> {
        let mut out = Vec::new();
        self.decompress_from(artifact, artifact.len() as u64, &mut out)?;
        String::from_utf8(out).map_err(|e| HuffError::Other(e.into()))
    }

    /// Decompress an artifact of `total_len` bytes read from `input`.
    /// Returns the number of symbols written.
    pub fn decompress_from<R: BufRead, W: Write>(
        &self,
        input: R,
        total_len: u64,
        out: &mut W,
    ) -> Result<u64> {
        let mut reader = Utf8Reader::new(input);
        let table = read_header(&mut reader)?;
        let header_len = reader.offset();
        let body = BitReader::new(reader.into_inner(), header_len, total_len);
        let symbols = decode_body(body, &table, out)?;
        out.flush()?;
        debug!(symbols, header_len, total_len, "body decoded");
        Ok(symbols)
    }

    /// Compress `src` next to itself under the configured suffix.
    pub fn compress_file(&self, src: &Path) -> Result<(PathBuf, CompressionStats)> {
        let dst = naming::compressed_path(src, &self.config)?;
        let stats = self.compress_file_to(src, &dst)?;
        Ok((dst, stats))
    }

    /// Two passes over `src`: one to count, one to encode. Nothing is left at
    /// `dst` unless the whole artifact was written.
    pub fn compress_file_to(&self, src: &Path, dst: &Path) -> Result<CompressionStats> {
        let capacity = self.config.io_buffer_capacity;
        let frequencies = FrequencyTable::from_reader(BufReader::with_capacity(capacity, File::open(src)?))?;
        let codes = CodeTable::from_frequencies(&frequencies)?;
        let input = Utf8Reader::new(BufReader::with_capacity(capacity, File::open(src)?));

        let stats = write_atomically(dst, capacity, |out| encode_symbols(&codes, &frequencies, input, out))?;
        info!(
            src = %src.display(),
            dst = %dst.display(),
            symbols = stats.symbols,
            bytes = stats.total_bytes(),
            "compressed"
        );
        Ok(stats)
    }

    /// Decompress `src` next to itself under the configured suffix.
    pub fn decompress_file(&self, src: &Path) -> Result<(PathBuf, u64)> {
        let dst = naming::decompressed_path(src, &self.config)?;
        let symbols = self.decompress_file_to(src, &dst)?;
        Ok((dst, symbols))
    }

    pub fn decompress_file_to(&self, src: &Path, dst: &Path) -> Result<u64> {
        let capacity = self.config.io_buffer_capacity;
        let file = File::open(src)?;
        let total_len = file.metadata()?.len();
        let input = BufReader::with_capacity(capacity, file);

        let symbols = write_atomically(dst, capacity, |out| self.decompress_from(input, total_len, out))?;
        info!(src = %src.display(), dst = %dst.display(), symbols, "decompressed");
        Ok(symbols)
    }
}

/// Write the header for `codes`, then the packed code of every symbol.
fn encode_symbols<I, W>(
    codes: &CodeTable,
    frequencies: &FrequencyTable,
    symbols: I,
    mut out: W,
) -> Result<CompressionStats>
where
    I: Iterator<Item = Result<char>>,
    W: Write,
{
    let header_bytes = write_header(codes, &mut out)?;
    debug!(distinct = codes.len(), header_bytes, "codebook header written");

    let mut writer = BitWriter::new(out);
    let mut count = 0u64;
    for symbol in symbols {
        writer.write_code(codes.code_for(symbol?)?)?;
        count += 1;
    }
    let (_, body) = writer.finish()?;
    debug!(units = body.units, bits = body.bits, "body written");

    Ok(CompressionStats {
        symbols: count,
        distinct_symbols: frequencies.len(),
        header_bytes,
        body_units: body.units,
        body_bits: body.bits,
    })
}

/// Run `write` against a temporary file beside `dst` and move it into place
/// only if it succeeds. The temporary file is removed on every failure path.
fn write_atomically<T, F>(dst: &Path, capacity: usize, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let dir = match dst.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

    let result = {
        let mut writer = BufWriter::with_capacity(capacity, tmp.as_file_mut());
        write(&mut writer).and_then(|value| {
            writer.flush()?;
            Ok(value)
        })
    };
    let value = match result {
        Ok(value) => value,
        Err(e) => {
            warn!(dst = %dst.display(), error = %e, "discarding partial output");
            return Err(e);
        }
    };

    tmp.persist(dst).map_err(|e| HuffError::Io(e.error))?;
    Ok(value)
}
