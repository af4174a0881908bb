//! Huffman tree construction.
//!
//! Nodes live in a flat arena and refer to their children by index, so the
//! tree has a single owner and no node can be shared between subtrees.

use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: char, count: u64 },
    Internal { count: u64, left: NodeId, right: NodeId },
}

impl Node {
    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }
}

/// Write-once Huffman tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// The heap is keyed by `(count, arena index)`. Leaves enter the arena in
    /// first-appearance order and merged nodes are appended as they are
    /// created, so equal counts always resolve the same way. The first node
    /// popped becomes the left child.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffError::EmptyAlphabet);
        }

        let mut nodes: Vec<Node> = frequencies
            .iter()
            .map(|(symbol, count)| Node::Leaf { symbol, count })
            .collect();
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| Reverse((node.count(), id)))
            .collect();

        while heap.len() > 1 {
            let (Some(Reverse((lc, left))), Some(Reverse((rc, right)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            let id = nodes.len();
            nodes.push(Node::Internal { count: lc + rc, left, right });
            heap.push(Reverse((lc + rc, id)));
        }

        let root = heap.pop().map(|Reverse((_, id))| id).ok_or(HuffError::EmptyAlphabet)?;
        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Sum of all symbol counts.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].count()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// True for the degenerate one-symbol tree.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root], Node::Leaf { .. })
    }
}
