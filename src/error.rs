//! Error types for the Huffman container codec.

use std::fmt;

use thiserror::Error;

/// Region of a container in which decoding ran out of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The two 32-bit length fields.
    Header,
    /// The pre-order serialized tree.
    Tree,
    /// The encoded symbol stream.
    Payload,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Header => "header",
            Region::Tree => "tree",
            Region::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Error variants for bit I/O, tree handling and container coding.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte stream had no more bytes when a bit was requested.
    #[error("unexpected end of input after {bits_read} bits")]
    UnexpectedEndOfInput {
        /// Bits successfully read before the stream ran dry.
        bits_read: u64,
    },

    /// The container ended before the region its header promised was complete.
    #[error("truncated container: input ended inside the {region} region at bit {bit_offset}")]
    TruncatedContainer {
        /// Region being decoded when input ran out.
        region: Region,
        /// Absolute bit offset into the container at which input ran out.
        bit_offset: u64,
    },

    /// Header lengths are impossible or disagree with the decoded regions.
    #[error("invalid header (tree_bits={tree_bits}, data_bits={data_bits}): {reason}")]
    InvalidHeader {
        /// Recorded tree region length.
        tree_bits: u32,
        /// Recorded payload region length.
        data_bits: u32,
        /// What failed.
        reason: &'static str,
    },

    /// The serialized tree is not a valid full binary tree over bytes.
    #[error("corrupt tree: {0}")]
    CorruptTree(&'static str),

    /// A bit count outside `[1, 64]` was passed to a multi-bit read or write.
    #[error("invalid bit count: {0} (must be in 1..=64)")]
    InvalidBitCount(u32),

    /// The payload would not fit the 32-bit `dataBitLength` field.
    #[error("input too large: {len} bytes cannot be framed in a 32-bit container")]
    InputTooLarge {
        /// Input length in bytes.
        len: u64,
    },

    /// The second encode pass saw a byte the first pass never counted.
    #[error("symbol 0x{0:02x} has no code; input changed between passes")]
    SymbolNotInTable(u8),

    /// An I/O error occurred on the underlying stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Re-label an end-of-input failure as a truncation of `region`.
    ///
    /// Other errors pass through untouched.
    pub(crate) fn in_region(region: Region) -> impl FnOnce(Error) -> Error {
        move |err| match err {
            Error::UnexpectedEndOfInput { bits_read } => Error::TruncatedContainer {
                region,
                bit_offset: bits_read,
            },
            other => other,
        }
    }

    /// True for the errors a damaged or shortened container produces.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::TruncatedContainer { .. }
                | Error::InvalidHeader { .. }
                | Error::CorruptTree(_)
                | Error::UnexpectedEndOfInput { .. }
        )
    }
}

/// Error returned by [`encode`](crate::encode).
pub type EncodeError = Error;

/// Error returned by [`decode`](crate::decode).
pub type DecodeError = Error;

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
