//! Save payload encoding.
//!
//! A payload is the JSON form of a [`Snapshot`]. It is stored in one of two
//! ways:
//!
//! ```text
//! {"state":{...},"config":{...}}        plain JSON
//! gz:H4sIAAAAAAAA/6tWKkktLlGyUl...       "gz:" + base64(gzip(JSON))
//! ```
//!
//! The `gz:` prefix is the only encoding marker, so decoding needs no
//! out-of-band metadata.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use guild_core::Snapshot;

use super::{PersistenceError, Result};

pub const COMPRESSED_PREFIX: &str = "gz:";

/// Encodes `snapshot`, compressing when `compress` is set.
///
/// Non-finite floats are rejected: JSON would write them as `null`, which
/// cannot be read back.
pub fn encode(snapshot: &Snapshot, compress: bool) -> Result<String> {
    ensure_finite(snapshot)?;
    let json = serde_json::to_string(snapshot)?;
    if !compress {
        return Ok(json);
    }

    let gzip_error = |e: std::io::Error| PersistenceError::Serialization(format!("gzip: {e}"));
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes()).map_err(gzip_error)?;
    let bytes = encoder.finish().map_err(gzip_error)?;
    Ok(format!("{COMPRESSED_PREFIX}{}", STANDARD.encode(bytes)))
}

/// Decodes a payload produced by [`encode`], in either form.
pub fn decode(payload: &str) -> Result<Snapshot> {
    match payload.strip_prefix(COMPRESSED_PREFIX) {
        Some(encoded) => {
            let bytes = STANDARD
                .decode(encoded.trim())
                .map_err(|e| PersistenceError::Serialization(format!("base64: {e}")))?;
            let mut json = String::new();
            GzDecoder::new(bytes.as_slice())
                .read_to_string(&mut json)
                .map_err(|e| PersistenceError::Serialization(format!("gunzip: {e}")))?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(serde_json::from_str(payload)?),
    }
}

pub fn is_compressed(payload: &str) -> bool {
    payload.starts_with(COMPRESSED_PREFIX)
}

fn ensure_finite(snapshot: &Snapshot) -> Result<()> {
    let fields = [
        ("state.position.x", snapshot.state.position.x),
        ("state.position.y", snapshot.state.position.y),
        ("config.scoreMultiplier", snapshot.config.score_multiplier),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, value)) => Err(PersistenceError::Serialization(format!(
            "{field} is not finite ({value})"
        ))),
        None => Ok(()),
    }
}
