//! Huffman trees over the byte alphabet.
//!
//! A [`Tree`] is built bottom-up from a [`FrequencyTable`] by repeatedly
//! merging the two lightest nodes, serialized pre-order into a bit stream,
//! and rebuilt from that stream on the decode side.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! It was the first practical algorithm for constructing optimal prefix codes.
//!
//! # Determinism
//!
//! Two nodes of equal weight are ordered by a sequence number: leaves are
//! numbered in ascending symbol order, internal nodes after all leaves in
//! creation order. The first node extracted becomes the left child. Given
//! the same input, the tree (and thus the container) is byte-identical
//! across runs and platforms.
//!
//! # Tree serialization
//!
//! ```text
//! internal node: 1 <left subtree> <right subtree>
//! leaf:          0 <symbol: 8 bits>
//! ```
//!
//! A tree with `L` leaves has `L - 1` internal nodes and serializes to
//! exactly `10L - 1` bits.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::io::{Read, Seek, Write};

use tracing::trace;

use crate::bitio::{for_each_chunk, BitReader, BitWriter};
use crate::error::{Error, Result};

/// Number of distinct symbols.
pub const ALPHABET_SIZE: usize = 256;

/// Width of a serialized leaf symbol.
pub const SYMBOL_BITS: u32 = 8;

/// Longest possible code: a fully skewed tree over the whole alphabet.
pub const MAX_CODE_LEN: usize = ALPHABET_SIZE - 1;

/// Bits a serialized tree with `leaves` leaves occupies.
pub const fn tree_bits_for_leaves(leaves: u64) -> u64 {
    if leaves == 0 {
        0
    } else {
        // (leaves - 1) internal flags + leaves * (flag + symbol)
        (leaves - 1) + leaves * (1 + SYMBOL_BITS as u64)
    }
}

/// Occurrence count per byte value.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Tally every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &b in data {
            table.record(b);
        }
        table
    }

    /// Tally every byte `reader` yields until end of stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        for_each_chunk(reader, |chunk| {
            chunk.iter().for_each(|&b| table.record(b));
            Ok(())
        })?;
        Ok(table)
    }

    /// Count one occurrence of `symbol`.
    #[inline]
    pub fn record(&mut self, symbol: u8) {
        self.counts[symbol as usize] += 1;
    }

    /// Count `n` occurrences of `symbol`.
    pub fn record_many(&mut self, symbol: u8, n: u64) {
        self.counts[symbol as usize] += n;
    }

    /// Occurrences of `symbol`.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts, i.e. the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present symbols and their counts, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Index of a node in a [`Tree`]'s arena.
pub type NodeId = usize;

/// Huffman tree node.
///
/// Weights are meaningful only for trees built from frequencies; decoded
/// trees carry zero weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Terminal node carrying a symbol.
    Leaf {
        /// Byte value emitted when this leaf is reached.
        symbol: u8,
        /// Occurrences of `symbol`.
        weight: u64,
    },
    /// Node with exactly two children.
    Internal {
        /// Child reached by a `0` bit.
        left: NodeId,
        /// Child reached by a `1` bit.
        right: NodeId,
        /// Sum of the children's weights.
        weight: u64,
    },
}

impl Node {
    /// Weight of the subtree rooted here.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A full binary tree stored in an arena.
///
/// Every traversal is iterative, so a maximally skewed 256-leaf tree is
/// handled without deep recursion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    sentinel: Option<NodeId>,
}

impl Tree {
    /// The tree of an empty input: no nodes, no code bits.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            sentinel: None,
        }
    }

    /// Build the Huffman tree for `freqs`.
    ///
    /// With a single distinct symbol `s` the root is synthesized with `s` as
    /// its left child and an unreachable sentinel leaf (symbol `s ^ 1`) on
    /// the right, so `s` still gets the one-bit code `0`.
    pub fn build(freqs: &FrequencyTable) -> Self {
        let distinct = freqs.distinct();
        let mut nodes = Vec::with_capacity(2 * distinct.max(1));
        let mut heap = BinaryHeap::with_capacity(distinct);

        for (seq, (symbol, weight)) in freqs.iter().enumerate() {
            heap.push(Reverse((weight, seq, nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }

        if nodes.is_empty() {
            return Self::empty();
        }
        if let [Node::Leaf { symbol, weight }] = nodes[..] {
            nodes.push(Node::Leaf {
                symbol: symbol ^ 0x01,
                weight: 0,
            });
            nodes.push(Node::Internal {
                left: 0,
                right: 1,
                weight,
            });
            return Self {
                nodes,
                root: Some(2),
                sentinel: Some(1),
            };
        }

        let mut seq = distinct;
        while heap.len() > 1 {
            if let (Some(Reverse((lw, _, left))), Some(Reverse((rw, _, right)))) =
                (heap.pop(), heap.pop())
            {
                let weight = lw + rw;
                let id = nodes.len();
                trace!(left, right, weight, id, "merge");
                nodes.push(Node::Internal {
                    left,
                    right,
                    weight,
                });
                heap.push(Reverse((weight, seq, id)));
                seq += 1;
            }
        }

        let root = heap.pop().map(|Reverse((_, _, id))| id);
        Self {
            nodes,
            root,
            sentinel: None,
        }
    }

    /// True for the tree of an empty input.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Root node id, `None` for the empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Id of the sentinel leaf of a single-symbol tree.
    pub fn sentinel(&self) -> Option<NodeId> {
        self.sentinel
    }

    /// Total weight, which equals the input length for built trees.
    pub fn weight(&self) -> u64 {
        self.root.map_or(0, |r| self.nodes[r].weight())
    }

    /// Number of leaves, sentinel included.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Bits [`encode`](Self::encode) will emit for this tree.
    pub fn encoded_len(&self) -> u64 {
        tree_bits_for_leaves(self.leaf_count() as u64)
    }

    /// Serialize pre-order: `1` then both subtrees for internal nodes,
    /// `0` then the 8-bit symbol for leaves. The empty tree writes nothing.
    pub fn encode<W: Write + Seek>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                Node::Internal { left, right, .. } => {
                    writer.bit(true)?;
                    stack.push(right);
                    stack.push(left);
                }
                Node::Leaf { symbol, .. } => {
                    writer.bit(false)?;
                    writer.write_bits(u64::from(symbol), SYMBOL_BITS)?;
                }
            }
        }
        Ok(())
    }

    /// Rebuild a tree serialized by [`encode`](Self::encode).
    ///
    /// # Errors
    /// `Error::UnexpectedEndOfInput` if the stream ends mid-tree;
    /// `Error::CorruptTree` if the root is a leaf or the stream describes
    /// more leaves than the alphabet holds.
    pub fn decode<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        // Slots waiting for a child: (parent, is_right). The root has no parent.
        let mut pending: Vec<Option<(NodeId, bool)>> = vec![None];
        let mut nodes: Vec<Node> = Vec::new();
        let mut leaves = 0usize;
        let mut internals = 0usize;

        while let Some(slot) = pending.pop() {
            let id = nodes.len();
            if reader.bit()? {
                internals += 1;
                if internals >= ALPHABET_SIZE {
                    return Err(Error::CorruptTree("more internal nodes than the alphabet allows"));
                }
                nodes.push(Node::Internal {
                    left: NodeId::MAX,
                    right: NodeId::MAX,
                    weight: 0,
                });
                pending.push(Some((id, true)));
                pending.push(Some((id, false)));
            } else {
                leaves += 1;
                if leaves > ALPHABET_SIZE {
                    return Err(Error::CorruptTree("more leaves than the alphabet allows"));
                }
                let symbol = reader.read_bits(SYMBOL_BITS)? as u8;
                nodes.push(Node::Leaf { symbol, weight: 0 });
            }

            if let Some((parent, is_right)) = slot {
                if let Node::Internal { left, right, .. } = &mut nodes[parent] {
                    if is_right {
                        *right = id;
                    } else {
                        *left = id;
                    }
                }
            }
        }

        if nodes.first().map_or(true, Node::is_leaf) {
            return Err(Error::CorruptTree("root is a leaf"));
        }

        Ok(Self {
            nodes,
            root: Some(0),
            sentinel: None,
        })
    }

    /// Derive every symbol's code in one top-down traversal.
    ///
    /// The sentinel leaf of a single-symbol tree gets no entry.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        let Some(root) = self.root else {
            return table;
        };

        let mut stack = vec![(root, Code::default())];
        while let Some((id, code)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { symbol, .. } => {
                    if self.sentinel != Some(id) {
                        table.codes[symbol as usize] = Some(code);
                    }
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right, code.child(true)));
                    stack.push((left, code.child(false)));
                }
            }
        }
        table
    }

    /// Decode one symbol by walking from the root: `0` goes left, `1` right.
    ///
    /// # Errors
    /// `Error::CorruptTree` on the empty tree, otherwise whatever the reader reports.
    pub fn read_symbol<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u8> {
        let mut id = self
            .root
            .ok_or(Error::CorruptTree("cannot decode symbols with an empty tree"))?;
        loop {
            match self.nodes[id] {
                Node::Leaf { symbol, .. } => return Ok(symbol),
                Node::Internal { left, right, .. } => {
                    id = if reader.bit()? { right } else { left };
                }
            }
        }
    }
}

/// A root-to-leaf path, `0` for left and `1` for right.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    /// Path bits, MSB-aligned across the words.
    words: [u64; 4],
    len: u16,
}

impl Code {
    /// This code extended by one step.
    fn child(mut self, bit: bool) -> Self {
        let i = self.len as usize;
        debug_assert!(i < MAX_CODE_LEN);
        if bit {
            self.words[i / 64] |= 1 << (63 - i % 64);
        }
        self.len += 1;
        self
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True for the zero-length code.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, counted from the root.
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.len(), "bit index {index} out of range");
        (self.words[index / 64] >> (63 - index % 64)) & 1 == 1
    }

    /// Bits in transmission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(|i| self.bit(i))
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }

    /// Append the code to `writer`, up to 64 bits per call.
    pub fn write_to<W: Write + Seek>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        let mut remaining = u32::from(self.len);
        for &word in &self.words {
            if remaining == 0 {
                break;
            }
            let n = remaining.min(64);
            writer.write_bits(word >> (64 - n), n)?;
            remaining -= n;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bits() {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

/// Symbol to code mapping derived from a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>, // symbol -> path
}

impl CodeTable {
    fn new() -> Self {
        Self {
            codes: vec![None; ALPHABET_SIZE],
        }
    }

    /// Code for `symbol`, if it occurs in the tree.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Symbols with codes, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as u8, c)))
    }

    /// Number of symbols with codes.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// True if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Payload bits needed to encode input with these frequencies.
    pub fn encoded_len(&self, freqs: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(s, code)| freqs.count(s) * code.len() as u64)
            .sum()
    }

    /// Append `symbol`'s code to `writer`.
    ///
    /// # Errors
    /// `Error::SymbolNotInTable` if the symbol never occurred when the tree was built.
    pub fn write_symbol<W: Write + Seek>(
        &self,
        symbol: u8,
        writer: &mut BitWriter<W>,
    ) -> Result<()> {
        self.get(symbol)
            .ok_or(Error::SymbolNotInTable(symbol))?
            .write_to(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn serialize(tree: &Tree) -> (Vec<u8>, u64) {
        let mut writer = BitWriter::new(Cursor::new(Vec::new())).unwrap();
        tree.encode(&mut writer).unwrap();
        let bits = writer.tell();
        writer.flush().unwrap();
        (writer.into_inner().into_inner(), bits)
    }

    fn code_str(table: &CodeTable, symbol: u8) -> String {
        table.get(symbol).unwrap().to_string()
    }

    #[test]
    fn test_frequency_table() {
        let freqs = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(freqs.count(b'a'), 5);
        assert_eq!(freqs.count(b'b'), 2);
        assert_eq!(freqs.count(b'z'), 0);
        assert_eq!(freqs.total(), 11);
        assert_eq!(freqs.distinct(), 5);

        let streamed = FrequencyTable::from_reader(Cursor::new(b"abracadabra")).unwrap();
        assert_eq!(freqs, streamed);

        let empty = FrequencyTable::from_bytes(b"");
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);
    }

    #[test]
    fn test_two_symbols() {
        let tree = Tree::build(&FrequencyTable::from_bytes(b"aaab"));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.weight(), 4);

        // b (weight 1) is extracted first and becomes the left child.
        let codes = tree.code_table();
        assert_eq!(code_str(&codes, b'b'), "0");
        assert_eq!(code_str(&codes, b'a'), "1");
        assert_eq!(codes.encoded_len(&FrequencyTable::from_bytes(b"aaab")), 4);
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::build(&FrequencyTable::new());
        assert!(tree.is_empty());
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.encoded_len(), 0);
        assert!(tree.code_table().is_empty());
        assert_eq!(serialize(&tree).1, 0);
    }

    #[test]
    fn test_single_symbol_uses_sentinel() {
        let tree = Tree::build(&FrequencyTable::from_bytes(b"zzzzz"));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);

        let sentinel = tree.sentinel().unwrap();
        assert_eq!(
            *tree.node(sentinel),
            Node::Leaf {
                symbol: b'z' ^ 1,
                weight: 0
            }
        );

        let codes = tree.code_table();
        assert_eq!(codes.len(), 1);
        assert_eq!(code_str(&codes, b'z'), "0");
        assert!(codes.get(b'z' ^ 1).is_none());
    }

    #[test]
    fn test_ties_break_by_symbol() {
        // All weights equal: the pairing is fixed by symbol order.
        let tree = Tree::build(&FrequencyTable::from_bytes(b"dcba"));
        let codes = tree.code_table();
        assert_eq!(code_str(&codes, b'a'), "00");
        assert_eq!(code_str(&codes, b'b'), "01");
        assert_eq!(code_str(&codes, b'c'), "10");
        assert_eq!(code_str(&codes, b'd'), "11");
    }

    #[test]
    fn test_leaves_before_internal_on_tie() {
        // a:1 b:1 merge into weight 2, which ties with c:2; c goes left.
        let tree = Tree::build(&FrequencyTable::from_bytes(b"abcc"));
        let codes = tree.code_table();
        assert_eq!(code_str(&codes, b'c'), "0");
        assert_eq!(code_str(&codes, b'a'), "10");
        assert_eq!(code_str(&codes, b'b'), "11");
    }

    #[test]
    fn test_uniform_alphabet_is_balanced() {
        let all: Vec<u8> = (0..=255).collect();
        let tree = Tree::build(&FrequencyTable::from_bytes(&all));
        assert_eq!(tree.leaf_count(), 256);
        assert_eq!(tree.depth(), 8);
        assert_eq!(tree.encoded_len(), 2559);

        // Ascending leaves pair off in order, so each code is the symbol itself.
        let codes = tree.code_table();
        for s in 0..=255u8 {
            assert_eq!(code_str(&codes, s), format!("{s:08b}"));
        }
    }

    #[test]
    fn test_serialized_layout() {
        let tree = Tree::build(&FrequencyTable::from_bytes(b"aaab"));
        let (bytes, bits) = serialize(&tree);
        assert_eq!(bits, 19);
        assert_eq!(bits, tree.encoded_len());
        // 1 | 0 01100010 ('b') | 0 01100001 ('a') | padding
        assert_eq!(bytes, vec![0b1001_1000, 0b1000_1100, 0b0010_0000]);
    }

    #[test]
    fn test_decode_restores_shape() {
        let data = b"this is an example of a huffman tree";
        let built = Tree::build(&FrequencyTable::from_bytes(data));
        let (bytes, bits) = serialize(&built);

        let mut reader = BitReader::new(Cursor::new(bytes));
        let decoded = Tree::decode(&mut reader).unwrap();
        assert_eq!(reader.position(), bits);
        assert_eq!(decoded.leaf_count(), built.leaf_count());
        assert_eq!(decoded.code_table(), built.code_table());
    }

    #[test]
    fn test_decode_rejects_leaf_root() {
        let mut reader = BitReader::new(Cursor::new(vec![0x30, 0x80]));
        assert!(matches!(
            Tree::decode(&mut reader),
            Err(Error::CorruptTree("root is a leaf"))
        ));
    }

    #[test]
    fn test_decode_rejects_endless_internals() {
        let mut reader = BitReader::new(Cursor::new(vec![0xff; 64]));
        assert!(matches!(Tree::decode(&mut reader), Err(Error::CorruptTree(_))));
    }

    #[test]
    fn test_decode_truncated_leaf() {
        // Internal flag, leaf flag, then only 6 symbol bits.
        let mut reader = BitReader::new(Cursor::new(vec![0b1000_0000]));
        assert!(matches!(
            Tree::decode(&mut reader),
            Err(Error::UnexpectedEndOfInput { bits_read: 8 })
        ));
    }

    #[test]
    fn test_skewed_tree_depth() {
        // Fibonacci weights force a fully skewed tree.
        let mut freqs = FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..40u8 {
            freqs.record_many(symbol, a);
            (a, b) = (b, a + b);
        }
        let tree = Tree::build(&freqs);
        assert_eq!(tree.leaf_count(), 40);
        assert_eq!(tree.depth(), 39);

        let codes = tree.code_table();
        assert_eq!(codes.get(0).unwrap().len(), 39);
        assert_eq!(codes.get(39).unwrap().len(), 1);
    }

    #[test]
    fn test_read_symbol_walks_codes() {
        let tree = Tree::build(&FrequencyTable::from_bytes(b"abcc"));
        // c=0, a=10, b=11
        let mut reader = BitReader::new(Cursor::new(vec![0b0101_1000]));
        assert_eq!(tree.read_symbol(&mut reader).unwrap(), b'c');
        assert_eq!(tree.read_symbol(&mut reader).unwrap(), b'a');
        assert_eq!(tree.read_symbol(&mut reader).unwrap(), b'b');
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn test_code_spanning_words() {
        let mut code = Code::default();
        for i in 0..100 {
            code = code.child(i % 3 == 0);
        }
        assert_eq!(code.len(), 100);

        let mut writer = BitWriter::new(Cursor::new(Vec::new())).unwrap();
        code.write_to(&mut writer).unwrap();
        assert_eq!(writer.tell(), 100);
        writer.flush().unwrap();

        let mut reader = BitReader::new(Cursor::new(writer.into_inner().into_inner()));
        for i in 0..100 {
            assert_eq!(reader.bit().unwrap(), i % 3 == 0, "bit {i}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_codes_are_prefix_free(data in prop::collection::vec(any::<u8>(), 1..400)) {
            let codes = Tree::build(&FrequencyTable::from_bytes(&data)).code_table();
            let entries: Vec<_> = codes.iter().collect();
            for (i, (_, a)) in entries.iter().enumerate() {
                for (_, b) in &entries[i + 1..] {
                    prop_assert!(!a.is_prefix_of(b));
                    prop_assert!(!b.is_prefix_of(a));
                }
            }
        }

        #[test]
        fn prop_leaf_count_matches_distinct(data in prop::collection::vec(any::<u8>(), 0..400)) {
            let freqs = FrequencyTable::from_bytes(&data);
            let tree = Tree::build(&freqs);
            let expected = match freqs.distinct() {
                1 => 2,
                n => n,
            };
            prop_assert_eq!(tree.leaf_count(), expected);
            prop_assert_eq!(tree.weight(), data.len() as u64);
            prop_assert_eq!(serialize(&tree).1, tree.encoded_len());
        }
    }
}
