//! Self-describing Huffman containers.
//!
//! ```text
//! bit 0                   : tree_bits  (u32, MSB first)
//! bit 32                  : data_bits  (u32, MSB first)
//! bit 64                  : tree region, tree_bits long
//! bit 64 + tree_bits      : payload region, data_bits long
//! ```
//!
//! The final byte is zero-padded. An empty input produces an 8-byte
//! container with both lengths zero.
//!
//! Encoding reads the input twice (frequencies, then payload) and writes the
//! body before the header is known: the length fields are reserved as zeros
//! and patched once the body has been measured. The input must therefore be
//! rewindable and the output seekable.

use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use tracing::{debug, trace, warn};

use crate::bitio::{for_each_chunk, BitReader, BitWriter};
use crate::config::CodecConfig;
use crate::error::{DecodeError, EncodeError, Error, Region, Result};
use crate::huffman::{tree_bits_for_leaves, FrequencyTable, Tree, ALPHABET_SIZE};

/// Width of each header length field.
pub const LENGTH_FIELD_BITS: u32 = 32;

/// Size of the fixed header.
pub const HEADER_BITS: u64 = 2 * LENGTH_FIELD_BITS as u64;

/// The two length fields at the start of every container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Bits in the serialized tree.
    pub tree_bits: u32,
    /// Bits in the encoded payload.
    pub data_bits: u32,
}

impl Header {
    /// Read both fields from the start of a container.
    pub fn read_from<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let tree_bits = reader.read_bits(LENGTH_FIELD_BITS)? as u32;
        let data_bits = reader.read_bits(LENGTH_FIELD_BITS)? as u32;
        Ok(Self {
            tree_bits,
            data_bits,
        })
    }

    /// Write both fields.
    pub fn write_to<W: Write + Seek>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        writer.write_bits(u64::from(self.tree_bits), LENGTH_FIELD_BITS)?;
        writer.write_bits(u64::from(self.data_bits), LENGTH_FIELD_BITS)
    }

    /// True for the header of an empty input.
    pub fn is_empty(&self) -> bool {
        self.tree_bits == 0 && self.data_bits == 0
    }

    /// Leaves implied by `tree_bits`, if it describes a tree over 2 to 256 leaves.
    pub fn leaf_count(&self) -> Option<usize> {
        let bits = u64::from(self.tree_bits) + 1;
        let leaves = bits / 10;
        let valid = (2..=ALPHABET_SIZE as u64).contains(&leaves)
            && tree_bits_for_leaves(leaves) == u64::from(self.tree_bits);
        valid.then_some(leaves as usize)
    }

    /// Reject lengths no encoder could have produced.
    pub fn validate(&self) -> Result<()> {
        match (self.tree_bits, self.data_bits) {
            (0, 0) => Ok(()),
            (0, _) => Err(self.invalid("payload present without a tree")),
            (_, 0) => Err(self.invalid("tree present without a payload")),
            _ if self.leaf_count().is_none() => {
                Err(self.invalid("tree length does not match any full tree over 2..=256 leaves"))
            }
            _ => Ok(()),
        }
    }

    fn invalid(&self, reason: &'static str) -> Error {
        Error::InvalidHeader {
            tree_bits: self.tree_bits,
            data_bits: self.data_bits,
            reason,
        }
    }
}

/// Huffman container encoder/decoder.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    /// Codec with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with an explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Encode all of `input` into a container written to `output`.
    ///
    /// `input` is read from its current position to the end, then rewound to
    /// that position and read again. The container starts at `output`'s
    /// current position, and `output` is left positioned just past it.
    ///
    /// # Errors
    /// `Error::InputTooLarge` if the payload cannot be framed in 32 bits,
    /// `Error::SymbolNotInTable` if the input changed between the passes,
    /// `Error::Io` for stream failures.
    pub fn encode<R, W>(&self, input: R, output: W) -> Result<Header>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        let mut input = BufReader::with_capacity(self.config.input_buffer_size, input);
        let start = input.stream_position()?;

        let freqs = FrequencyTable::from_reader(&mut input)?;
        let len = freqs.total();
        if len > u64::from(u32::MAX) {
            return Err(Error::InputTooLarge { len });
        }
        let tree = Tree::build(&freqs);

        let output = BufWriter::with_capacity(self.config.output_buffer_size, output);
        let mut writer = BitWriter::new(output)?;
        Header::default().write_to(&mut writer)?;

        if tree.is_empty() {
            writer.flush()?;
            debug!(input_len = 0, "encoded empty container");
            return Ok(Header::default());
        }

        tree.encode(&mut writer)?;
        let tree_bits = writer.tell() - HEADER_BITS;
        debug_assert_eq!(tree_bits, tree.encoded_len());

        let codes = tree.code_table();
        if u32::try_from(codes.encoded_len(&freqs)).is_err() {
            return Err(Error::InputTooLarge { len });
        }

        input.seek(SeekFrom::Start(start))?;
        let payload_start = writer.tell();
        for_each_chunk(&mut input, |chunk| {
            chunk
                .iter()
                .try_for_each(|&symbol| codes.write_symbol(symbol, &mut writer))
        })?;
        let data_bits = writer.tell() - payload_start;

        let header = Header {
            tree_bits: tree_bits as u32,
            data_bits: u32::try_from(data_bits).map_err(|_| Error::InputTooLarge { len })?,
        };

        writer.flush()?;
        let end = writer.tell() / 8;
        writer.seek(0)?;
        header.write_to(&mut writer)?;
        writer.seek(end)?;
        trace!(end, "patched header");

        debug!(
            input_len = len,
            distinct_symbols = freqs.distinct(),
            tree_bits = header.tree_bits,
            data_bits = header.data_bits,
            "encoded container"
        );
        Ok(header)
    }

    /// Decode a container from `input`, writing the original bytes to `output`.
    ///
    /// Bytes are emitted as they are decoded; on failure, whatever was
    /// decoded before the failure point has already reached `output`.
    ///
    /// # Errors
    /// `Error::TruncatedContainer` if input ends inside the header, tree or
    /// payload; `Error::InvalidHeader` if the lengths are implausible or
    /// disagree with the decoded regions; `Error::CorruptTree` for a
    /// structurally impossible tree.
    pub fn decode<R, W>(&self, input: R, output: W) -> Result<Header>
    where
        R: Read,
        W: Write,
    {
        let input = BufReader::with_capacity(self.config.input_buffer_size, input);
        let mut reader = BitReader::new(input);

        let header = Header::read_from(&mut reader).map_err(Error::in_region(Region::Header))?;
        if self.config.verify_header {
            if let Err(e) = header.validate() {
                warn!(
                    tree_bits = header.tree_bits,
                    data_bits = header.data_bits,
                    "rejecting implausible header"
                );
                return Err(e);
            }
        }

        if header.tree_bits == 0 {
            if header.data_bits != 0 {
                return Err(header.invalid("payload present without a tree"));
            }
            debug!("decoded empty container");
            return Ok(header);
        }

        let tree = Tree::decode(&mut reader).map_err(Error::in_region(Region::Tree))?;
        let tree_consumed = reader.position() - HEADER_BITS;
        if self.config.verify_header && tree_consumed != u64::from(header.tree_bits) {
            return Err(header.invalid("tree region length disagrees with the decoded tree"));
        }

        let mut output = BufWriter::with_capacity(self.config.output_buffer_size, output);
        let payload_start = reader.position();
        let data_bits = u64::from(header.data_bits);
        let mut produced = 0u64;
        while reader.position() - payload_start < data_bits {
            let symbol = tree
                .read_symbol(&mut reader)
                .map_err(Error::in_region(Region::Payload))?;
            output.write_all(&[symbol])?;
            produced += 1;
        }
        output.flush()?;

        if reader.position() - payload_start != data_bits {
            return Err(header.invalid("last code runs past the payload length"));
        }

        debug!(
            output_len = produced,
            leaves = tree.leaf_count(),
            tree_bits = header.tree_bits,
            data_bits = header.data_bits,
            "decoded container"
        );
        Ok(header)
    }
}

/// Encode `input` into a container on `output` with the default configuration.
pub fn encode<R, W>(input: R, output: W) -> std::result::Result<(), EncodeError>
where
    R: Read + Seek,
    W: Write + Seek,
{
    HuffmanCodec::new().encode(input, output).map(|_| ())
}

/// Decode the container on `input` into `output` with the default configuration.
pub fn decode<R, W>(input: R, output: W) -> std::result::Result<(), DecodeError>
where
    R: Read,
    W: Write,
{
    HuffmanCodec::new().decode(input, output).map(|_| ())
}

/// Encode an in-memory buffer into a container.
pub fn encode_to_vec(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    encode(Cursor::new(data), &mut out)?;
    Ok(out.into_inner())
}

/// Decode an in-memory container.
pub fn decode_to_vec(container: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(container, &mut out)?;
    Ok(out)
}
