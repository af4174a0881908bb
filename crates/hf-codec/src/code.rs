//! Code assignment: symbol → bit string, and the inverse table used while
//! decoding.

use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node, NodeId};
use bitvec::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A variable-length binary code, most significant bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: BitVec<u8, Msb0>,
}

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this code extended by one bit.
    pub fn child(&self, bit: bool) -> Self {
        let mut bits = self.bits.clone();
        bits.push(bit);
        Self { bits }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        self.bits.as_bitslice()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(self.bits.as_bitslice())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = HuffError;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .bytes()
            .enumerate()
            .map(|(i, b)| match b {
                b'0' => Ok(false),
                b'1' => Ok(true),
                _ => Err(HuffError::MalformedHeader {
                    offset: i as u64,
                    reason: format!("unexpected code digit {:?}", b as char),
                }),
            })
            .collect::<Result<BitVec<u8, Msb0>>>()?;
        Ok(Self { bits })
    }
}

/// Symbol → code mapping produced for one compression run.
///
/// Entries keep the pre-order position of their leaf, which is also the
/// order they are written to the codebook header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    entries: Vec<(char, Code)>,
    index: HashMap<char, usize>,
}

impl CodeTable {
    /// Assign every leaf the path from the root to it (left = 0, right = 1).
    ///
    /// Traversal is iterative and pre-order; each stack frame carries its own
    /// path so siblings never observe each other's extensions. A tree that is
    /// a single leaf gets the code `0`, since an empty code could never be
    /// matched by the decoder.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut table = Self::default();
        if let Node::Leaf { symbol, .. } = *tree.node(tree.root()) {
            table.insert(symbol, Code::new().child(false));
            return table;
        }

        let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::new())];
        while let Some((id, path)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => table.insert(symbol, path),
                Node::Internal { left, right, .. } => {
                    stack.push((right, path.child(true)));
                    stack.push((left, path.child(false)));
                }
            }
        }
        table
    }

    /// Build the tree for `frequencies` and assign codes. An empty table
    /// yields an empty code table.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Ok(Self::default());
        }
        let tree = HuffmanTree::build(frequencies)?;
        Ok(Self::from_tree(&tree))
    }

    fn insert(&mut self, symbol: char, code: Code) {
        self.index.insert(symbol, self.entries.len());
        self.entries.push((symbol, code));
    }

    pub fn get(&self, symbol: char) -> Option<&Code> {
        self.index.get(&symbol).map(|&i| &self.entries[i].1)
    }

    pub fn code_for(&self, symbol: char) -> Result<&Code> {
        self.get(symbol).ok_or(HuffError::UnknownSymbol(symbol))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Code)> + '_ {
        self.entries.iter().map(|(symbol, code)| (*symbol, code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_code_len(&self) -> usize {
        self.entries.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Bits the body will occupy for input with these frequencies.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }

    /// Check that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.entries.iter().map(|(_, code)| code).collect();
        codes.sort();
        // in sorted order a prefix sorts immediately before some extension of it
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }
}

/// Code → symbol mapping rebuilt from a codebook header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeTable {
    symbols: HashMap<Code, char>,
    max_len: usize,
}

impl DecodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: Code, symbol: char) -> Result<()> {
        if self.symbols.contains_key(&code) {
            return Err(HuffError::DuplicateCode { code: code.to_string() });
        }
        self.max_len = self.max_len.max(code.len());
        self.symbols.insert(code, symbol);
        Ok(())
    }

    pub fn get(&self, code: &Code) -> Option<char> {
        self.symbols.get(code).copied()
    }

    /// Length of the longest code; an unmatched prefix longer than this can
    /// never resolve.
    pub fn max_code_len(&self) -> usize {
        self.max_len
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.symbols.keys().collect();
        codes.sort();
        codes.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl From<&CodeTable> for DecodeTable {
    fn from(table: &CodeTable) -> Self {
        let mut decode = Self::new();
        for (symbol, code) in table.iter() {
            decode.max_len = decode.max_len.max(code.len());
            decode.symbols.insert(code.clone(), symbol);
        }
        decode
    }
}
