use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::trie::{Node, Trie, ALPHABET};

/// Codeword per symbol, derived from a trie. Left edges are `0`, right
/// edges `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<BitBox<u8, Msb0>>>,
}

impl CodeTable {
    pub fn from_trie(trie: &Trie) -> Self {
        fn traverse(
            node: &Node,
            path: &mut BitVec<u8, Msb0>,
            codes: &mut [Option<BitBox<u8, Msb0>>],
        ) {
            match node {
                Node::Leaf { symbol } => {
                    codes[*symbol as usize] = Some(path.clone().into_boxed_bitslice());
                }
                Node::Internal { left, right } => {
                    path.push(false);
                    traverse(left, path, codes);
                    path.pop();

                    path.push(true);
                    traverse(right, path, codes);
                    path.pop();
                }
            }
        }

        let mut codes = vec![None; ALPHABET];
        traverse(trie.root(), &mut BitVec::new(), &mut codes);
        Self { codes }
    }

    /// `None` for symbols that have no leaf in the trie.
    pub fn get(&self, symbol: u8) -> Option<&BitSlice<u8, Msb0>> {
        self.codes[symbol as usize].as_deref()
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, code)| code.as_deref().map(|c| (s as u8, c)))
    }
}

/// Text form of a codeword, e.g. `"0110"`.
pub fn render(code: &BitSlice<u8, Msb0>) -> String {
    code.iter()
        .by_vals()
        .map(|b| if b { '1' } else { '0' })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableCodeTable {
    codes: BTreeMap<u8, (usize, Box<[u8]>)>,
}

impl<'a> From<&'a CodeTable> for SerializableCodeTable {
    fn from(other: &'a CodeTable) -> Self {
        Self {
            codes: other
                .iter()
                .map(|(s, code)| {
                    // a codeword is stored as its bit length plus packed bytes
                    let bytes = code.to_bitvec().into_vec().into_boxed_slice();
                    (s, (code.len(), bytes))
                })
                .collect(),
        }
    }
}

impl From<SerializableCodeTable> for CodeTable {
    fn from(other: SerializableCodeTable) -> Self {
        let mut codes = vec![None; ALPHABET];
        for (s, (len, bytes)) in other.codes {
            let mut bv = BitVec::<u8, Msb0>::from_vec(bytes.into_vec());
            bv.resize(len, false);
            codes[s as usize] = Some(bv.into_boxed_bitslice());
        }
        Self { codes }
    }
}
