//! # Body Decoding
//!
//! Turns a buffered response body into text: undo any `Content-Encoding`,
//! then decode with the `Content-Type` charset (UTF-8 when absent).

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;

/// Decode a response body to text. Undecodable bytes are replaced.
pub fn decode_body(raw: Bytes, content_encoding: Option<&str>, content_type: Option<&str>) -> String {
    let bytes = match content_encoding.map(|e| e.trim().to_ascii_lowercase()) {
        Some(encoding) if !encoding.is_empty() && encoding != "identity" => {
            match decompress(&raw, &encoding) {
                Ok(decoded) => Bytes::from(decoded),
                Err(e) => {
                    tracing::warn!("Could not undo content-encoding '{}': {}", encoding, e);
                    raw
                }
            }
        }
        _ => raw,
    };

    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::debug!("Body contained invalid {} sequences", encoding.name());
    }
    text.into_owned()
}

fn decompress(raw: &[u8], encoding: &str) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    match encoding {
        "gzip" | "x-gzip" => {
            GzDecoder::new(raw).read_to_end(&mut out)?;
        }
        "deflate" => {
            ZlibDecoder::new(raw).read_to_end(&mut out)?;
        }
        "zstd" => {
            out = zstd::stream::decode_all(raw)?;
        }
        other => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("unsupported encoding '{other}'"),
            ))
        }
    }
    Ok(out)
}

/// `text/html; charset="ISO-8859-1"` -> `ISO-8859-1`
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}
