//! Compress and decompress pipelines.
//!
//! Archive layout, all integers big-endian:
//!
//! ```text
//! [code trie, preorder bit encoding]
//! [original length: u32]
//! [one codeword per original byte]
//! [zero padding to the next byte boundary]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{HuffmanError, Result};
use crate::trie::{Frequencies, Trie};

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub original_len: u32,
    pub distinct_symbols: usize,
    pub trie_bits: u64,
    pub payload_bits: u64,
    /// Archive size in bytes, padding included.
    pub encoded_len: u64,
}

impl Stats {
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.encoded_len as f64 / self.original_len as f64
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.1}%), {} symbols, trie {} bits, payload {} bits",
            self.original_len,
            self.encoded_len,
            self.ratio() * 100.0,
            self.distinct_symbols,
            self.trie_bits,
            self.payload_bits,
        )
    }
}

/// Two passes over `input`: one to count, one to encode. `input` is rewound
/// to its start between them and read in 8 KiB chunks; `output` is buffered
/// here, so plain files can be passed for both.
pub fn compress<R, W>(mut input: R, output: W) -> Result<Stats>
where
    R: Read + Seek,
    W: Write,
{
    info!("compressing");

    input.seek(SeekFrom::Start(0))?;
    let freq = Frequencies::count(&mut input)?;
    let original_len = freq.total_u32()?;

    let trie = Trie::from_frequencies(&freq);
    let table = trie.code_table();

    let mut writer = BitWriter::new(BufWriter::new(output));
    trie.write_to(&mut writer)?;
    let trie_bits = writer.bits_written();
    writer.write_u32(original_len)?;
    debug!(original_len, trie_bits, "wrote archive header");

    input.seek(SeekFrom::Start(0))?;
    let mut body = (&mut input).take(freq.total());
    let mut seen = 0u64;
    let mut chunk = [0u8; 8 * 1024];
    loop {
        let n = match body.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &chunk[..n] {
            let code = table.get(byte).ok_or(HuffmanError::InputChanged)?;
            writer.write_bits(code)?;
        }
        seen += n as u64;
    }
    if seen != freq.total() {
        return Err(HuffmanError::InputChanged);
    }

    let total_bits = writer.bits_written();
    writer.close()?;

    let stats = Stats {
        original_len,
        distinct_symbols: freq.distinct(),
        trie_bits,
        payload_bits: total_bits - trie_bits - 32,
        encoded_len: total_bits.div_ceil(8),
    };
    info!(%stats, "compression completed");
    Ok(stats)
}

/// Restores the original bytes from an archive. Returns how many bytes were
/// written to `output`.
///
/// Both ends are wrapped in buffers, since bits are pulled one byte at a
/// time and symbols are emitted one byte at a time.
pub fn decompress<R, W>(input: R, output: W) -> Result<u32>
where
    R: Read,
    W: Write,
{
    info!("decompressing");

    let mut reader = BitReader::new(BufReader::new(input))?;
    let mut output = BufWriter::new(output);
    let trie = Trie::read_from(&mut reader)?;
    let len = reader.read_u32()?;
    if reader.overran() {
        return Err(HuffmanError::CorruptArchive("truncated length header"));
    }
    debug!(leaves = trie.leaf_count(), len, "read archive header");

    for _ in 0..len {
        let symbol = trie.decode_symbol(&mut reader)?;
        if reader.overran() {
            return Err(HuffmanError::CorruptArchive(
                "bitstream ended before all symbols were decoded",
            ));
        }
        output.write_all(&[symbol])?;
    }

    reader.close();
    output.flush()?;
    info!(len, "decompression completed");
    Ok(len)
}

pub fn compress_file(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<Stats> {
    let input = File::open(source)?;
    let output = File::create(target)?;
    compress(input, output)
}

pub fn decompress_file(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<u32> {
    let input = File::open(source)?;
    let output = File::create(target)?;
    decompress(input, output)
}

/// In-memory convenience wrapper around [`compress`].
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress(io::Cursor::new(data), &mut out)?;
    Ok(out)
}

/// In-memory convenience wrapper around [`decompress`].
pub fn decompress_bytes(archive: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress(archive, &mut out)?;
    Ok(out)
}
