//! Huffman coding: optimal prefix-free codes for text, and the
//! header-plus-packed-body artifact format built on them.
//!
//! Stages:
//! 1. Frequency counting over a UTF-8 symbol stream
//! 2. Tree construction (min-heap merge of the two lightest nodes)
//! 3. Code assignment (root-to-leaf paths, left = 0)
//! 4. Codebook header (symbol/code entries terminated by a sentinel)
//! 5. Body packing into 7-bit units, and greedy prefix decoding

pub mod bitstream;
pub mod code;
pub mod codebook;
pub mod config;
pub mod error;
pub mod frequency;
pub mod naming;
pub mod pipeline;
pub mod tree;
pub mod utf8;

pub use code::{Code, CodeTable, DecodeTable};
pub use config::HuffConfig;
pub use error::{HuffError, Result};
pub use frequency::FrequencyTable;
pub use pipeline::{CompressionStats, HuffmanPipeline};
pub use tree::HuffmanTree;
