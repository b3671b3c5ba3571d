//! # mzML Parser Module
//!
//! Streaming parsing of mzML files, the XML-based community standard for mass
//! spectrometry data defined by HUPO-PSI. Only the parts of a spectrum needed
//! to build MS/MS peak lists are extracted: precursors, user parameters and
//! the m/z and intensity arrays.
//!
//! ## mzML Structure
//!
//! ```text
//! indexedmzML (optional wrapper)
//! └── mzML
//!     ├── cvList, fileDescription, softwareList, ... (skipped)
//!     └── run
//!         └── spectrumList
//!             └── spectrum* (many)
//!                 ├── cvParam* / userParam*
//!                 ├── scanList
//!                 ├── precursorList (for MS2+)
//!                 │   └── precursor* (one per isolation window)
//!                 │       ├── isolationWindow
//!                 │       └── selectedIonList
//!                 └── binaryDataArrayList
//!                     └── binaryDataArray*
//!                         ├── cvParam* (encoding info)
//!                         └── binary (base64 data)
//! ```

mod binary;
mod cv_params;
mod models;
pub mod streamer;

pub use binary::{
    ArrayDescriptor, ArrayKind, BinaryDecodeError, BinaryDecoder, BinaryEncoding,
    CompressionType as BinaryCompression,
};
pub use cv_params::{find_cv_param, CvParam, MS_CV_ACCESSIONS};
pub use models::*;
pub use streamer::{MzMLError, MzMLStreamer, SpectrumIterator};
