#![no_main]

use libfuzzer_sys::fuzz_target;
use mjpeg_parser::{Constraints, Event, FrameExtractor};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // The first byte picks where the input is split into two chunks.
    let split = data[0] as usize % data.len();
    let data = &data[1..];
    let split = split.min(data.len());

    let constraints = Constraints::new().max_line_length(64).max_headers(8).max_frame_size(1024);
    let mut extractor = FrameExtractor::with_constraints("X-BOUNDARY", constraints);

    for chunk in [&data[..split], &data[split..]] {
        let res = extractor.push(chunk, |event| {
            if let Event::Frame(frame) = event {
                assert!(frame.len() <= 1024);
            }
        });

        if res.is_err() {
            extractor.clear();
        }
    }

    let _ = extractor.finish();
});
