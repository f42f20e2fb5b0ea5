//! # Huffman containers
//!
//! *Self-describing, bit-packed Huffman compression for byte streams.*
//!
//! ## Intuition First
//!
//! Imagine writing a message where common letters cost less ink than rare ones.
//! If `e` appears a thousand times and `q` twice, giving `e` a one-bit code and
//! `q` a twelve-bit code saves far more than it costs. Huffman's construction
//! finds the assignment that minimizes total ink, under one constraint: no code
//! may be the beginning of another, so a reader never needs separators.
//!
//! ## The Problem
//!
//! A prefix code is useless to a reader who does not have it. This crate packs
//! the code tree itself into the output, ahead of the payload, so a container
//! decodes with nothing but its own bytes:
//!
//! ```text
//! [tree_bits: u32][data_bits: u32][tree, pre-order][payload codes][pad]
//! ```
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Entropy as the fundamental limit
//! 1952  Huffman     Optimal prefix codes by bottom-up merging
//! 1964  Schwartz    Canonical codes: lengths alone determine the code
//! 1985  Vitter      Adaptive (one-pass) Huffman coding
//! 1996  Deutsch     DEFLATE pairs LZ77 with Huffman (RFC 1951)
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol probabilities $p_s$ and code lengths $\ell_s$, Huffman codes
//! minimize $\sum_s p_s \ell_s$ over all prefix codes, and satisfy
//!
//! ```text
//! H(p) <= sum_s p_s * l_s < H(p) + 1
//! ```
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(n + k \log k)$ to encode $n$ bytes over $k \le 256$
//!   distinct symbols; decoding is $O(\ell_s)$ per symbol.
//! - **Space**: $O(k)$ for the tree and code table; input and output are
//!   streamed.
//!
//! ## Failure Modes
//!
//! 1. **Two passes**: the whole frequency table must be known before the first
//!    code is written, so the input has to be rewindable.
//! 2. **Integer-length codes**: a symbol with probability 0.9 still costs a
//!    full bit; highly skewed inputs compress worse than entropy suggests.
//! 3. **32-bit framing**: payloads of more than `u32::MAX` bits are rejected.
//!
//! ## Implementation Notes
//!
//! - [`bitio`]: MSB-first [`BitReader`]/[`BitWriter`] with seek-back patching.
//! - [`huffman`]: deterministic tree construction, pre-order serialization,
//!   code derivation, per-symbol decoding.
//! - [`container`]: header framing plus the two encode passes and the decode walk.
//!
//! ```
//! let container = huffpack::encode_to_vec(b"abracadabra")?;
//! assert_eq!(huffpack::decode_to_vec(&container)?, b"abracadabra");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Cover, T. M., Thomas, J. A. (2006). *Elements of Information Theory*, ch. 5.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod config;
pub mod container;
pub mod error;
pub mod huffman;

pub use bitio::{BitReader, BitWriter};
pub use config::CodecConfig;
pub use container::{decode, decode_to_vec, encode, encode_to_vec, Header, HuffmanCodec};
pub use error::{DecodeError, EncodeError, Error, Region, Result};
pub use huffman::{Code, CodeTable, FrequencyTable, Node, Tree};
