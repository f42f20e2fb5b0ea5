#![no_main]
use huffpack::{CodecConfig, HuffmanCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (bool, Vec<u8>)| {
    let (verify, container) = data;
    let codec = HuffmanCodec::with_config(CodecConfig::default().with_verify_header(verify));

    let mut output = Vec::new();
    if let Ok(header) = codec.decode(container.as_slice(), &mut output) {
        // One output byte needs at least one payload bit.
        assert!(output.len() as u64 <= u64::from(header.data_bits));
    }
});
