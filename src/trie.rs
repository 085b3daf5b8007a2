use derivative::Derivative;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{self, Read, Write};
use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::error::{HuffmanError, Result};

/// Number of distinct byte symbols.
pub const ALPHABET: usize = 256;

// A full binary tree over at most 256 leaves is at most 255 levels deep.
const MAX_DEPTH: usize = ALPHABET - 1;

/// Per-byte occurrence counts of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequencies {
    counts: [u64; ALPHABET],
    total: u64,
}

impl Frequencies {
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET],
            total: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut freq = Self::new();
        freq.add(bytes);
        freq
    }

    /// Counts every byte `reader` yields until end of data.
    pub fn count<R: Read>(mut reader: R) -> Result<Self> {
        let mut freq = Self::new();
        let mut chunk = [0u8; 8 * 1024];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => return Ok(freq),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            freq.add(&chunk[..n]);
        }
    }

    pub fn add(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
        self.total += bytes.len() as u64;
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Total as it is stored in the 32-bit archive length field.
    pub fn total_u32(&self) -> Result<u32> {
        u32::try_from(self.total).map_err(|_| HuffmanError::InputTooLarge(self.total))
    }

    /// Number of symbols that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(symbol, count)` for every symbol that occurs, in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(s, c)| (s as u8, *c))
    }
}

impl Default for Frequencies {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8 },
    Internal { left: Box<Node>, right: Box<Node> },
}

impl Node {
    fn leaf(symbol: u8) -> Self {
        Node::Leaf { symbol }
    }

    fn from_children(left: Node, right: Node) -> Self {
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Heap entry. Ordered by weight, ties broken by insertion order.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Weighted {
    weight: u64,
    order: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

/// Prefix code tree with byte symbols at the leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie {
    root: Node,
}

impl Trie {
    /// Huffman construction over the symbols present in `freq`.
    ///
    /// The result always has at least two leaves: inputs with fewer than two
    /// distinct bytes are padded with weight 0 leaves for the smallest unused
    /// symbols, so every codeword is at least one bit long.
    pub fn from_frequencies(freq: &Frequencies) -> Self {
        let mut order = 0;
        let mut entry = |weight, node| {
            order += 1;
            Reverse(Weighted {
                weight,
                order,
                node,
            })
        };

        let mut pq: BinaryHeap<_> = freq
            .iter()
            .map(|(s, count)| entry(count, Node::leaf(s)))
            .collect();

        let mut unused = (0..=u8::MAX).filter(|&s| freq.get(s) == 0);
        while pq.len() < 2 {
            match unused.next() {
                Some(s) => pq.push(entry(0, Node::leaf(s))),
                None => break,
            }
        }

        // every pass pops two and pushes one, so the heap is never empty here
        let root = loop {
            let Reverse(left) = pq.pop().expect("heap holds at least one node");
            match pq.pop() {
                Some(Reverse(right)) => {
                    let weight = left.weight + right.weight;
                    pq.push(entry(weight, Node::from_children(left.node, right.node)));
                }
                None => break left.node,
            }
        };

        let trie = Self { root };
        debug!(
            leaves = trie.leaf_count(),
            depth = trie.depth(),
            "built code trie"
        );
        trie
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest codeword.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_trie(self)
    }

    /// Preorder: `1` + symbol byte for a leaf, `0` + left + right otherwise.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        fn write_node<W: Write>(node: &Node, writer: &mut BitWriter<W>) -> Result<()> {
            match node {
                Node::Leaf { symbol } => {
                    writer.write_bit(true)?;
                    writer.write_byte(*symbol)
                }
                Node::Internal { left, right } => {
                    writer.write_bit(false)?;
                    write_node(left, writer)?;
                    write_node(right, writer)
                }
            }
        }

        write_node(&self.root, writer)
    }

    /// Inverse of [`Trie::write_to`].
    ///
    /// Fails with `CorruptArchive` when the stream ends inside the trie, when
    /// the trie is deeper or has more leaves than the byte alphabet allows, or
    /// when the root is a lone leaf.
    pub fn read_from<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        fn read_node<R: Read>(
            reader: &mut BitReader<R>,
            depth: usize,
            leaves: &mut usize,
        ) -> Result<Node> {
            if depth > MAX_DEPTH {
                return Err(HuffmanError::CorruptArchive("code trie is too deep"));
            }

            let is_leaf = reader.read_bit()?;
            if is_leaf {
                let symbol = reader.read_byte()?;
                if reader.overran() {
                    return Err(HuffmanError::CorruptArchive("truncated code trie"));
                }
                *leaves += 1;
                if *leaves > ALPHABET {
                    return Err(HuffmanError::CorruptArchive("code trie has too many leaves"));
                }
                return Ok(Node::leaf(symbol));
            }
            if reader.overran() {
                return Err(HuffmanError::CorruptArchive("truncated code trie"));
            }

            let left = read_node(reader, depth + 1, leaves)?;
            let right = read_node(reader, depth + 1, leaves)?;
            Ok(Node::from_children(left, right))
        }

        let mut leaves = 0;
        let root = read_node(reader, 0, &mut leaves)?;
        if root.is_leaf() {
            return Err(HuffmanError::CorruptArchive("code trie has a single leaf"));
        }
        Ok(Self { root })
    }

    /// Walks from the root to a leaf, one bit per edge: `0` left, `1` right.
    pub fn decode_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u8> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { symbol } => return Ok(*symbol),
                Node::Internal { left, right } => {
                    node = if reader.read_bit()? { right } else { left };
                }
            }
        }
    }
}
