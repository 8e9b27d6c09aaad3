//! Benchmarks for the binary rANS coder.

use trisplit_rans::{decode, decode_reconstructed_stream, encode, encode_reconstructed_stream};

fn main() {
    let test_cases = vec![
        ("balanced", generate_balanced(1024 * 1024)),
        ("skewed_1_in_16", generate_skewed(1024 * 1024, 16)),
        ("skewed_1_in_256", generate_skewed(1024 * 1024, 256)),
        ("uniform_zero", vec![0u8; 1024 * 1024]),
    ];

    println!("Binary rANS Benchmarks");
    println!("======================\n");

    for (name, data) in &test_cases {
        println!("Test: {} ({} symbols)", name, data.len());

        let start = std::time::Instant::now();
        let compressed = encode(data);
        let enc_time = start.elapsed();

        let start = std::time::Instant::now();
        let decoded = decode(&compressed).expect("decode failed");
        let dec_time = start.elapsed();

        assert_eq!(&decoded, data, "rANS roundtrip failed for {}", name);

        let enc_throughput = data.len() as f64 / enc_time.as_secs_f64() / 1024.0 / 1024.0;
        let dec_throughput = data.len() as f64 / dec_time.as_secs_f64() / 1024.0 / 1024.0;

        println!(
            "  Encode:  {:7.2} Msym/s ({:8.2} µs), {} -> {} bytes",
            enc_throughput,
            enc_time.as_micros(),
            data.len(),
            compressed.len()
        );
        println!(
            "  Decode:  {:7.2} Msym/s ({:8.2} µs)",
            dec_throughput,
            dec_time.as_micros()
        );
        println!();
    }

    // The 2-bit rewrite path
    let recon = generate_skewed(1024 * 1024, 32);
    let ones = recon.iter().filter(|&&s| s == 1).count();
    let common = ones >= recon.len() / 2;

    let start = std::time::Instant::now();
    let compressed = encode_reconstructed_stream(&recon, common);
    let enc_time = start.elapsed();

    let start = std::time::Instant::now();
    let decoded = decode_reconstructed_stream(&compressed, common).expect("decode failed");
    let dec_time = start.elapsed();

    assert_eq!(decoded, recon, "2-bit rewrite roundtrip failed");
    println!(
        "Test: reconstructed_rewrite ({} symbols)\n  Encode: {:8.2} µs, {} -> {} bytes\n  Decode: {:8.2} µs",
        recon.len(),
        enc_time.as_micros(),
        recon.len(),
        compressed.len(),
        dec_time.as_micros()
    );
}

fn generate_balanced(len: usize) -> Vec<u8> {
    // Simple xorshift so the bench needs no external RNG
    let mut state = 0x2545F491u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 1) as u8
        })
        .collect()
}

fn generate_skewed(len: usize, one_in: usize) -> Vec<u8> {
    (0..len).map(|i| (i % one_in == 0) as u8).collect()
}
