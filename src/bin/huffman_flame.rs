use huffpack::{decode_to_vec, encode_to_vec};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), huffpack::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = (0..100_000)
        .map(|i: u32| match i % 7 {
            0..=3 => b'a',
            4..=5 => b'b',
            _ => (i % 200) as u8,
        })
        .collect::<Vec<_>>();

    let mut container = Vec::new();
    for _ in 0..200 {
        container = encode_to_vec(&input)?;
        let output = decode_to_vec(&container)?;
        assert_eq!(output, input);
    }

    info!(
        input_len = input.len(),
        container_len = container.len(),
        "finished profiling loop"
    );
    Ok(())
}
