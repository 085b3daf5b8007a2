//! Static Huffman compression of byte streams.
//!
//! ```
//! let archive = huffzip::compress_bytes(b"AAAAABBBCCD")?;
//! assert_eq!(huffzip::decompress_bytes(&archive)?, b"AAAAABBBCCD");
//! # Ok::<(), huffzip::HuffmanError>(())
//! ```

pub mod bitio;
pub mod code;
pub mod error;
pub mod pipeline;
pub mod trie;

pub use bitio::{BitReader, BitWriter};
pub use code::{CodeTable, SerializableCodeTable};
pub use error::{HuffmanError, Result};
pub use pipeline::{
    compress, compress_bytes, compress_file, decompress, decompress_bytes, decompress_file, Stats,
};
pub use trie::{Frequencies, Node, Trie};
