//! Symbol frequency counting.

use crate::error::Result;
use crate::utf8::Utf8Reader;
use std::collections::HashMap;
use std::io::BufRead;

/// Occurrence count per symbol, in first-appearance order.
///
/// The order is what makes tree construction reproducible: ties between
/// equal counts are broken by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every symbol of `text`.
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();
        for symbol in text.chars() {
            table.record(symbol);
        }
        table
    }

    /// Consume a UTF-8 stream in one forward pass and count its symbols.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        for symbol in Utf8Reader::new(reader) {
            table.record(symbol?);
        }
        Ok(table)
    }

    pub fn record(&mut self, symbol: char) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, 1));
            }
        }
    }

    pub fn count(&self, symbol: char) -> u64 {
        self.index.get(&symbol).map_or(0, |&i| self.entries[i].1)
    }

    /// Distinct symbols seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total symbols read.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }
}
