//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming line decoder and
//! asserts that it never panics, never yields an oversized or blank line,
//! and never yields a line containing a newline.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use cpubridge::rpc::codec::{LineDecoder, MAX_LINE_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();
    let check = |line: &str| {
        assert!(line.len() <= MAX_LINE_SIZE, "line exceeds MAX_LINE_SIZE");
        assert!(!line.trim().is_empty(), "decoder must not yield blank lines");
        assert!(!line.contains('\n'), "line must not contain a newline");
    };

    // Split the input at an arbitrary point to exercise partial reads.
    let split = data.first().map_or(0, |b| usize::from(*b) % (data.len() + 1));
    decoder.feed(&data[..split], check);
    decoder.feed(&data[split..], check);
    decoder.finish(check);

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    decoder.feed(data, check);
});
