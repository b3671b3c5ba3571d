use quick_xml::events::BytesStart;

use super::MzMLError;
use crate::mzml::cv_params::CvParam;

/// Get an attribute value from a start tag
pub(super) fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, MzMLError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MzMLError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = std::str::from_utf8(&attr.value)?.to_string();
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Parse a cvParam element
pub(super) fn parse_cv_param(e: &BytesStart) -> Result<CvParam, MzMLError> {
    Ok(CvParam {
        accession: get_attribute(e, "accession")?.unwrap_or_default(),
        name: get_attribute(e, "name")?.unwrap_or_default(),
        value: get_attribute(e, "value")?,
    })
}

/// Parse a userParam element into its name/value pair
pub(super) fn parse_user_param(e: &BytesStart) -> Result<(String, String), MzMLError> {
    let name = get_attribute(e, "name")?.unwrap_or_default();
    let value = get_attribute(e, "value")?.unwrap_or_default();
    Ok((name, value))
}
