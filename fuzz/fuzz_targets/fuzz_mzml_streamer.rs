#![no_main]

use libfuzzer_sys::fuzz_target;
use metfrag_exporter::mzml::MzMLStreamer;
use metfrag_exporter::reader::read_spectra;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail with an error, never panic
    if let Ok(mut streamer) = MzMLStreamer::new(Cursor::new(data)) {
        let _ = read_spectra(&mut streamer, Some(100));
    }
});
