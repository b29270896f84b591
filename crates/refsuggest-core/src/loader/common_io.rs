// crates/refsuggest-core/src/loader/common_io.rs
use crate::error::{LookupError, Result};
use serde::de::DeserializeOwned;

#[cfg(feature = "compact")]
use std::io::Read;

/// Content encoding of a dataset payload, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Gzip,
    Zlib,
    Plain,
}

/// Detect the payload encoding.
///
/// Storage buckets hand out `.json.gz` objects either raw or with the content
/// encoding already stripped, so the extension alone tells us nothing.
pub fn sniff(bytes: &[u8]) -> PayloadEncoding {
    match bytes {
        [0x1f, 0x8b, ..] => PayloadEncoding::Gzip,
        [cmf, flg, ..] if cmf & 0x0f == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0 => {
            PayloadEncoding::Zlib
        }
        _ => PayloadEncoding::Plain,
    }
}

/// Decompress (if needed) and parse a JSON array of records.
pub fn decode_payload<R: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<R>> {
    if bytes.is_empty() {
        return Err(LookupError::InvalidData("empty dataset payload".into()));
    }

    let json = match sniff(bytes) {
        PayloadEncoding::Plain => return Ok(serde_json::from_slice(bytes)?),
        encoding => inflate(bytes, encoding)?,
    };

    Ok(serde_json::from_slice(&json)?)
}

#[cfg(feature = "compact")]
fn inflate(bytes: &[u8], encoding: PayloadEncoding) -> Result<Vec<u8>> {
    use flate2::read::{GzDecoder, ZlibDecoder};

    let mut out = Vec::with_capacity(bytes.len() * 4);
    match encoding {
        PayloadEncoding::Gzip => GzDecoder::new(bytes).read_to_end(&mut out)?,
        PayloadEncoding::Zlib => ZlibDecoder::new(bytes).read_to_end(&mut out)?,
        PayloadEncoding::Plain => return Ok(bytes.to_vec()),
    };
    Ok(out)
}

#[cfg(not(feature = "compact"))]
fn inflate(_bytes: &[u8], encoding: PayloadEncoding) -> Result<Vec<u8>> {
    Err(LookupError::InvalidData(format!(
        "{encoding:?} payload but 'compact' disabled"
    )))
}
