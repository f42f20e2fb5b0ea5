#![no_main]
use huffpack::{decode_to_vec, encode_to_vec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let container = encode_to_vec(data).unwrap();
    let output = decode_to_vec(&container).unwrap();
    assert_eq!(data, output.as_slice());

    // Any shortened container must be rejected, not silently accepted.
    if container.len() > 8 {
        let cut = data.len() % (container.len() - 8) + 1;
        assert!(decode_to_vec(&container[..container.len() - cut]).is_err());
    }
});
