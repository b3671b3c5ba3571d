use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};

use super::helpers::{get_attribute, parse_cv_param, parse_user_param};
use super::{MzMLError, MzMLStreamer};
use crate::mzml::binary::{ArrayDescriptor, ArrayKind, BinaryDecoder};
use crate::mzml::cv_params::{find_cv_param, CvParam, MS_CV_ACCESSIONS};
use crate::mzml::models::{DataArray, MzMLSpectrum, Precursor};

/// Where inside a `<spectrum>` the parser currently is
#[derive(Debug, Default)]
struct SpectrumContext {
    in_precursor_list: bool,
    in_binary: bool,
    current_precursor: Option<Precursor>,
    current_binary_array: Option<BinaryArrayContext>,
}

/// Context for parsing binary data arrays
#[derive(Debug, Default)]
struct BinaryArrayContext {
    cv_params: Vec<CvParam>,
    base64_data: String,
}

impl<R: BufRead> MzMLStreamer<R> {
    /// Read the next spectrum from the stream
    pub fn next_spectrum(&mut self) -> Result<Option<MzMLSpectrum>, MzMLError> {
        if !self.in_spectrum_list {
            self.read_metadata()?;
            if !self.in_spectrum_list {
                return Ok(None);
            }
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if e.name().as_ref() == b"spectrum" {
                        let spectrum = self.parse_spectrum(&e)?;
                        self.current_spectrum_index += 1;
                        return Ok(Some(spectrum));
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"spectrumList" {
                        self.in_spectrum_list = false;
                        return Ok(None);
                    }
                }
                Ok(Event::Eof) => {
                    self.in_spectrum_list = false;
                    return Ok(None);
                }
                Err(e) => return Err(MzMLError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Parse a single spectrum element
    fn parse_spectrum(&mut self, start_event: &BytesStart) -> Result<MzMLSpectrum, MzMLError> {
        let mut spectrum = MzMLSpectrum {
            index: get_attribute(start_event, "index")?
                .and_then(|s| s.parse().ok())
                .unwrap_or(self.current_spectrum_index),
            id: get_attribute(start_event, "id")?.unwrap_or_default(),
            default_array_length: get_attribute(start_event, "defaultArrayLength")?
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            ms_level: 1,
            ..Default::default()
        };

        let mut depth = 1;
        let mut ctx = SpectrumContext::default();
        let mut buf = Vec::new();

        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    match e.name().as_ref() {
                        b"precursorList" => ctx.in_precursor_list = true,
                        b"precursor" => {
                            ctx.current_precursor = Some(Precursor {
                                spectrum_ref: get_attribute(e, "spectrumRef")?,
                                ..Default::default()
                            });
                        }
                        b"binaryDataArray" => {
                            ctx.current_binary_array = Some(BinaryArrayContext::default());
                        }
                        b"binary" => ctx.in_binary = true,
                        _ => Self::handle_param_element(&mut spectrum, &mut ctx, e)?,
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    Self::handle_param_element(&mut spectrum, &mut ctx, e)?;
                }
                Ok(Event::Text(ref t)) => {
                    if ctx.in_binary {
                        if let Some(ref mut array) = ctx.current_binary_array {
                            array.base64_data.push_str(&t.unescape()?);
                        }
                    }
                }
                Ok(Event::End(ref e)) => {
                    depth -= 1;
                    match e.name().as_ref() {
                        b"spectrum" if depth == 0 => break,
                        b"precursorList" => ctx.in_precursor_list = false,
                        b"precursor" => {
                            if let Some(prec) = ctx.current_precursor.take() {
                                spectrum.precursors.push(prec);
                            }
                        }
                        b"binary" => ctx.in_binary = false,
                        b"binaryDataArray" => {
                            if let Some(array) = ctx.current_binary_array.take() {
                                Self::decode_binary_array(&mut spectrum, array)?;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => {
                    return Err(MzMLError::InvalidStructure(format!(
                        "Unexpected EOF in spectrum '{}'",
                        spectrum.id
                    )));
                }
                Err(e) => return Err(MzMLError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        if let Some(level) = find_cv_param(&spectrum.cv_params, MS_CV_ACCESSIONS::MS_LEVEL)
            .and_then(|cv| cv.value_as_i64())
        {
            spectrum.ms_level = level as i16;
        }

        log::debug!(
            "Parsed spectrum '{}' (ms level {}, {} precursors, {} peaks)",
            spectrum.id,
            spectrum.ms_level,
            spectrum.precursors.len(),
            spectrum.peak_count()
        );

        Ok(spectrum)
    }

    /// Route a `cvParam` or `userParam` to the element it belongs to
    fn handle_param_element(
        spectrum: &mut MzMLSpectrum,
        ctx: &mut SpectrumContext,
        e: &BytesStart,
    ) -> Result<(), MzMLError> {
        match e.name().as_ref() {
            b"cvParam" => {
                let cv_param = parse_cv_param(e)?;
                if let Some(ref mut array) = ctx.current_binary_array {
                    array.cv_params.push(cv_param);
                } else if ctx.in_precursor_list {
                    if let Some(ref mut prec) = ctx.current_precursor {
                        Self::apply_precursor_cv_param(prec, &cv_param);
                    }
                } else {
                    spectrum.cv_params.push(cv_param);
                }
            }
            b"userParam" => {
                if ctx.current_binary_array.is_none() {
                    let (name, value) = parse_user_param(e)?;
                    spectrum.user_params.insert(name, value);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply CV param to precursor properties
    fn apply_precursor_cv_param(precursor: &mut Precursor, cv: &CvParam) {
        match cv.accession.as_str() {
            MS_CV_ACCESSIONS::ISOLATION_WINDOW_TARGET_MZ => {
                precursor.isolation_window_target = cv.value_as_f64();
            }
            MS_CV_ACCESSIONS::SELECTED_ION_MZ => {
                // Only the first selected ion of a precursor counts
                if precursor.selected_ion_mz.is_none() {
                    precursor.selected_ion_mz = cv.value_as_f64();
                }
            }
            _ => {}
        }
    }

    /// Decode binary array and add to spectrum
    fn decode_binary_array(
        spectrum: &mut MzMLSpectrum,
        array: BinaryArrayContext,
    ) -> Result<(), MzMLError> {
        let descriptor = ArrayDescriptor::from_cv_params(&array.cv_params);
        let Some(kind) = descriptor.kind else {
            return Ok(());
        };

        let values =
            BinaryDecoder::decode(&array.base64_data, descriptor.encoding, descriptor.compression)
                .map_err(|source| MzMLError::BinaryError {
                    id: spectrum.id.clone(),
                    source,
                })?;

        if values.len() != spectrum.default_array_length {
            log::debug!(
                "Spectrum '{}': {:?} array has {} values, defaultArrayLength is {}",
                spectrum.id,
                kind,
                values.len(),
                spectrum.default_array_length
            );
        }

        let data = DataArray::new(values, descriptor.encoding);
        match kind {
            ArrayKind::Mz => spectrum.mz_array = Some(data),
            ArrayKind::Intensity => spectrum.intensity_array = Some(data),
        }

        Ok(())
    }
}
