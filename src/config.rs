//! Codec configuration.

/// Default capacity of the buffers wrapped around caller streams (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Knobs for [`HuffmanCodec`](crate::HuffmanCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Check header plausibility before decoding and cross-check the
    /// recorded tree length against the bits actually consumed (default: true).
    pub verify_header: bool,

    /// Input buffer size (default: 64 KiB).
    pub input_buffer_size: usize,

    /// Output buffer size (default: 64 KiB).
    pub output_buffer_size: usize,
}

impl CodecConfig {
    /// Enable or disable header verification on decode.
    pub fn with_verify_header(mut self, verify: bool) -> Self {
        self.verify_header = verify;
        self
    }

    /// Set the input buffer capacity. Zero is raised to one byte.
    pub fn with_input_buffer_size(mut self, size: usize) -> Self {
        self.input_buffer_size = size.max(1);
        self
    }

    /// Set the output buffer capacity. Zero is raised to one byte.
    pub fn with_output_buffer_size(mut self, size: usize) -> Self {
        self.output_buffer_size = size.max(1);
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            verify_header: true,
            input_buffer_size: DEFAULT_BUFFER_SIZE,
            output_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
