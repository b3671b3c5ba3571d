//! Binary data decoding for mzML
//!
//! mzML stores numerical arrays (m/z, intensity) as Base64-encoded binary data,
//! optionally compressed with zlib. Decoding runs in three steps:
//!
//! 1. Base64 decode the text
//! 2. Decompress if needed (zlib)
//! 3. Interpret bytes as float32 or float64 (little-endian)

use std::io::Read;

use base64::prelude::*;
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;

use super::cv_params::{CvParam, MS_CV_ACCESSIONS};

/// Compression types used in mzML binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    /// No compression (raw binary)
    #[default]
    None,
    /// zlib compression (most common)
    Zlib,
    /// MS-Numpress linear prediction
    NumpressLinear,
    /// MS-Numpress positive integer compression
    NumpressPic,
    /// MS-Numpress short logged float compression
    NumpressSlof,
}

impl CompressionType {
    /// Determine compression type from CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        match accession {
            MS_CV_ACCESSIONS::ZLIB_COMPRESSION => Some(CompressionType::Zlib),
            MS_CV_ACCESSIONS::NO_COMPRESSION => Some(CompressionType::None),
            MS_CV_ACCESSIONS::NUMPRESS_LINEAR => Some(CompressionType::NumpressLinear),
            MS_CV_ACCESSIONS::NUMPRESS_PIC => Some(CompressionType::NumpressPic),
            MS_CV_ACCESSIONS::NUMPRESS_SLOF => Some(CompressionType::NumpressSlof),
            _ => None,
        }
    }
}

/// Binary encoding precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryEncoding {
    /// 32-bit floating point (CV: MS:1000521)
    Float32,
    /// 64-bit floating point (CV: MS:1000523)
    #[default]
    Float64,
}

impl BinaryEncoding {
    /// Determine encoding from CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        match accession {
            MS_CV_ACCESSIONS::FLOAT_32_BIT => Some(BinaryEncoding::Float32),
            MS_CV_ACCESSIONS::FLOAT_64_BIT => Some(BinaryEncoding::Float64),
            _ => None,
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            BinaryEncoding::Float32 => 4,
            BinaryEncoding::Float64 => 8,
        }
    }
}

/// Which spectrum array a `<binaryDataArray>` holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// m/z values
    Mz,
    /// Intensity values
    Intensity,
}

/// Everything the CV params of a `<binaryDataArray>` say about its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayDescriptor {
    pub kind: Option<ArrayKind>,
    pub encoding: BinaryEncoding,
    pub compression: CompressionType,
}

impl ArrayDescriptor {
    /// Collect array type, precision and compression from the array's CV params.
    ///
    /// Missing precision defaults to 64-bit, missing compression to none.
    pub fn from_cv_params(cv_params: &[CvParam]) -> Self {
        let mut descriptor = Self::default();
        for cv in cv_params {
            if let Some(encoding) = BinaryEncoding::from_cv_accession(&cv.accession) {
                descriptor.encoding = encoding;
            } else if let Some(compression) = CompressionType::from_cv_accession(&cv.accession) {
                descriptor.compression = compression;
            } else {
                match cv.accession.as_str() {
                    MS_CV_ACCESSIONS::MZ_ARRAY => descriptor.kind = Some(ArrayKind::Mz),
                    MS_CV_ACCESSIONS::INTENSITY_ARRAY => {
                        descriptor.kind = Some(ArrayKind::Intensity)
                    }
                    _ => {}
                }
            }
        }
        descriptor
    }
}

/// Errors that can occur during binary decoding
#[derive(Debug, thiserror::Error)]
pub enum BinaryDecodeError {
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Decompression error: {0}")]
    DecompressionError(#[from] std::io::Error),

    #[error("Invalid data length: {actual} bytes is not a multiple of {value_size}")]
    InvalidLength { value_size: usize, actual: usize },

    #[error("Unsupported compression: {0:?}")]
    UnsupportedCompression(CompressionType),
}

/// Decoder for mzML binary data arrays
pub struct BinaryDecoder;

impl BinaryDecoder {
    /// Decode a Base64-encoded binary array from mzML
    ///
    /// An empty payload decodes to an empty vector. The number of values is not
    /// checked against `defaultArrayLength`; that is left to the caller.
    pub fn decode(
        base64_data: &str,
        encoding: BinaryEncoding,
        compression: CompressionType,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        let trimmed = base64_data.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        // Some writers wrap long payloads over several lines
        let compact: String;
        let payload = if trimmed.contains(char::is_whitespace) {
            compact = trimmed.split_whitespace().collect();
            compact.as_str()
        } else {
            trimmed
        };

        let decoded_bytes = BASE64_STANDARD.decode(payload)?;

        let uncompressed = match compression {
            CompressionType::None => decoded_bytes,
            CompressionType::Zlib => {
                let mut decoder = ZlibDecoder::new(&decoded_bytes[..]);
                let mut uncompressed = Vec::new();
                decoder.read_to_end(&mut uncompressed)?;
                uncompressed
            }
            CompressionType::NumpressLinear
            | CompressionType::NumpressPic
            | CompressionType::NumpressSlof => {
                return Err(BinaryDecodeError::UnsupportedCompression(compression));
            }
        };

        Self::bytes_to_floats(&uncompressed, encoding)
    }

    /// Convert raw little-endian bytes to f64 values
    fn bytes_to_floats(
        bytes: &[u8],
        encoding: BinaryEncoding,
    ) -> Result<Vec<f64>, BinaryDecodeError> {
        let value_size = encoding.byte_size();

        if bytes.len() % value_size != 0 {
            return Err(BinaryDecodeError::InvalidLength {
                value_size,
                actual: bytes.len(),
            });
        }

        let count = bytes.len() / value_size;
        let mut values = Vec::with_capacity(count);
        let mut cursor = std::io::Cursor::new(bytes);

        match encoding {
            BinaryEncoding::Float32 => {
                for _ in 0..count {
                    values.push(cursor.read_f32::<LittleEndian>()? as f64);
                }
            }
            BinaryEncoding::Float64 => {
                for _ in 0..count {
                    values.push(cursor.read_f64::<LittleEndian>()?);
                }
            }
        }

        Ok(values)
    }
}
