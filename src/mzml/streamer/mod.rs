//! Streaming mzML parser using quick-xml
//!
//! A pull-based parser that hands out one `<spectrum>` at a time, so the
//! file never has to fit in memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;

use super::models::MzMLFileMetadata;

pub use error::MzMLError;
pub use iterators::SpectrumIterator;

mod error;
mod helpers;
mod iterators;
mod metadata;
mod spectrum;


/// Default input buffer size for mzML parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming parser for mzML files
pub struct MzMLStreamer<R: BufRead> {
    reader: Reader<R>,
    metadata: MzMLFileMetadata,
    metadata_read: bool,
    in_spectrum_list: bool,
    current_spectrum_index: i64,
}

impl MzMLStreamer<BufReader<File>> {
    /// Open an mzML file for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MzMLError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, file))
    }
}

impl<R: BufRead> MzMLStreamer<R> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R) -> Result<Self, MzMLError> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        Ok(Self {
            reader: xml_reader,
            metadata: MzMLFileMetadata::default(),
            metadata_read: false,
            in_spectrum_list: false,
            current_spectrum_index: 0,
        })
    }

    /// Get the file metadata read so far
    pub fn metadata(&self) -> &MzMLFileMetadata {
        &self.metadata
    }

    /// Number of spectra handed out so far
    pub fn spectra_read(&self) -> usize {
        self.current_spectrum_index as usize
    }

    /// Iterate over all spectra
    pub fn spectra(self) -> SpectrumIterator<R> {
        SpectrumIterator { streamer: self }
    }
}
