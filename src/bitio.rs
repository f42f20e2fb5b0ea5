//! Bit-granular streams over byte-oriented I/O.
//!
//! Both directions are MSB-first: the first bit read from (or written to) a
//! byte is its most significant bit. Multi-bit values take an explicit bit
//! count in `[1, 64]` and travel most-significant bit first, so a 32-bit
//! field is big-endian on the wire.
//!
//! [`BitWriter`] needs a seekable sink: container headers are written as
//! placeholders, the body is produced and measured with
//! [`BitWriter::tell`], and the header is patched afterwards with
//! [`BitWriter::seek`].

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// Largest bit count accepted by [`BitReader::read_bits`] and [`BitWriter::write_bits`].
pub const MAX_BITS_PER_CALL: u32 = 64;

/// Feed every chunk `reader` yields to `f` until end of stream.
///
/// Interrupted reads are retried; any other read error is returned as is.
pub(crate) fn for_each_chunk<R, F>(mut reader: R, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut chunk = [0u8; 8192];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        f(&chunk[..n])?;
    }
}

fn check_count(count: u32) -> Result<()> {
    if count == 0 || count > MAX_BITS_PER_CALL {
        return Err(Error::InvalidBitCount(count));
    }
    Ok(())
}

/// Reads individual bits from a byte stream.
///
/// The reader pulls one byte at a time from `R`; wrap unbuffered sources in
/// a [`std::io::BufReader`].
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    current: u8,
    /// Unread bits left in `current` (0-8).
    remaining: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a reader positioned at the first bit of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            remaining: 0,
            bits_read: 0,
        }
    }

    /// Read the next bit.
    ///
    /// # Errors
    /// Returns `Error::UnexpectedEndOfInput` if the stream is exhausted.
    pub fn bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            let mut byte = [0u8; 1];
            if let Err(e) = self.inner.read_exact(&mut byte) {
                return Err(match e.kind() {
                    io::ErrorKind::UnexpectedEof => Error::UnexpectedEndOfInput {
                        bits_read: self.bits_read,
                    },
                    _ => Error::Io(e),
                });
            }
            self.current = byte[0];
            self.remaining = 8;
        }

        self.remaining -= 1;
        self.bits_read += 1;
        Ok((self.current >> self.remaining) & 1 == 1)
    }

    /// Read `count` bits into an unsigned integer, first bit most significant.
    ///
    /// # Errors
    /// Returns `Error::InvalidBitCount` if `count` is not in `[1, 64]`, or
    /// `Error::UnexpectedEndOfInput` if the stream ends first.
    pub fn read_bits(&mut self, count: u32) -> Result<u64> {
        check_count(count)?;

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | u64::from(self.bit()?);
        }
        Ok(value)
    }

    /// Total number of bits consumed so far.
    pub fn position(&self) -> u64 {
        self.bits_read
    }

    /// Unwrap the reader. Bits left in a partially consumed byte are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Writes individual bits to a seekable byte stream.
///
/// Bits accumulate in a one-byte buffer that is emitted as soon as it is
/// full. Offsets given to [`seek`](Self::seek) are relative to the stream
/// position at construction, so a writer can frame data in the middle of a
/// larger stream.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    origin: u64,
    buffer: u8,
    /// Bits held in `buffer` (0-7).
    pending: u8,
    cursor: u64,
}

impl<W: Write + Seek> BitWriter<W> {
    /// Create a writer anchored at the current position of `inner`.
    ///
    /// # Errors
    /// Fails if the stream position cannot be queried.
    pub fn new(mut inner: W) -> Result<Self> {
        let origin = inner.stream_position()?;
        Ok(Self {
            inner,
            origin,
            buffer: 0,
            pending: 0,
            cursor: 0,
        })
    }

    /// Append one bit.
    pub fn bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | u8::from(bit);
        self.pending += 1;
        self.cursor += 1;

        if self.pending == 8 {
            let byte = self.buffer;
            self.buffer = 0;
            self.pending = 0;
            self.inner.write_all(&[byte])?;
        }
        Ok(())
    }

    /// Append the `count` least-significant bits of `value`, most significant first.
    ///
    /// # Errors
    /// Returns `Error::InvalidBitCount` if `count` is not in `[1, 64]`.
    pub fn write_bits(&mut self, value: u64, count: u32) -> Result<()> {
        check_count(count)?;

        for shift in (0..count).rev() {
            self.bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Total bits written since construction (or since the last seek target).
    ///
    /// Padding emitted by [`flush`](Self::flush) counts toward the total.
    pub fn tell(&self) -> u64 {
        self.cursor
    }

    /// Reposition to `byte_offset` bytes past the writer's origin.
    ///
    /// Any partial byte is flushed first, so the writer is byte-aligned
    /// afterwards and [`tell`](Self::tell) reports `byte_offset * 8`.
    pub fn seek(&mut self, byte_offset: u64) -> Result<()> {
        self.flush()?;
        self.inner.seek(SeekFrom::Start(self.origin + byte_offset))?;
        self.cursor = byte_offset * 8;
        Ok(())
    }

    /// Zero-pad and emit the current partial byte, then flush the stream.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending > 0 {
            let padding = 8 - self.pending;
            let byte = self.buffer << padding;
            self.cursor += u64::from(padding);
            self.buffer = 0;
            self.pending = 0;
            self.inner.write_all(&[byte])?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Unwrap the writer. Call [`flush`](Self::flush) first or a partial byte is lost.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
