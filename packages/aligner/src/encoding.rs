//! Two-step decoding of input files.
//!
//! 1. Strict: a byte-order mark selects the encoding, otherwise the bytes
//!    must be valid UTF-8.
//! 2. Fallback: the encoding declared in the XML declaration, then the
//!    encoding guessed by `chardetng`.
//!
//! Every step decodes without replacement, so a residual failure surfaces as
//! [`AlignerError::Decode`] instead of garbled text. Single-byte guesses
//! such as windows-1252 accept any input, so in practice the error comes from
//! multi-byte encodings (declared or guessed) meeting malformed sequences.

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::bytes::Regex;

use crate::error::{AlignerError, Result};

/// Number of leading bytes searched for an XML encoding declaration.
const DECLARATION_WINDOW: usize = 256;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DECLARED_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).expect("valid regex")
});

/// Text decoded from raw input bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,

    /// Name of the encoding that succeeded.
    pub encoding: &'static str,

    /// Whether the fallback step was needed.
    pub fallback: bool,
}

/// Decode raw bytes using the strict step, then the fallback step.
///
/// `context` names the input in errors and logs.
///
/// # Examples
/// ```
/// use lexlink_aligner::encoding::decode_bytes;
///
/// let decoded = decode_bytes("Königreich".as_bytes(), "inline").unwrap();
/// assert_eq!(decoded.text, "Königreich");
/// assert_eq!(decoded.encoding, "UTF-8");
/// assert!(!decoded.fallback);
/// ```
pub fn decode_bytes(bytes: &[u8], context: &str) -> Result<DecodedText> {
    if let Some(decoded) = decode_strict(bytes) {
        return Ok(decoded);
    }

    let declared = declared_encoding(bytes);
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);

    decode_fallback(bytes, context, declared, guessed)
}

/// Fallback step: the declared encoding first, then the guessed one.
fn decode_fallback(
    bytes: &[u8],
    context: &str,
    declared: Option<&'static Encoding>,
    guessed: &'static Encoding,
) -> Result<DecodedText> {
    if let Some(encoding) = declared {
        if let Some(text) = decode_with(encoding, bytes) {
            tracing::info!(context, encoding = encoding.name(), "Decoded with declared encoding");
            return Ok(DecodedText {
                text,
                encoding: encoding.name(),
                fallback: true,
            });
        }
    }

    if declared != Some(guessed) {
        if let Some(text) = decode_with(guessed, bytes) {
            tracing::info!(context, encoding = guessed.name(), "Decoded with detected encoding");
            return Ok(DecodedText {
                text,
                encoding: guessed.name(),
                fallback: true,
            });
        }
    }

    let tried = match declared {
        Some(d) if d != guessed => format!("UTF-8, {}, {}", d.name(), guessed.name()),
        _ => format!("UTF-8, {}", guessed.name()),
    };
    Err(AlignerError::Decode {
        context: context.to_string(),
        encoding: tried,
    })
}

/// Strict step: BOM-selected encoding, or plain UTF-8.
fn decode_strict(bytes: &[u8]) -> Option<DecodedText> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let text = decode_with(encoding, &bytes[bom_len..])?;
        return Some(DecodedText {
            text,
            encoding: encoding.name(),
            fallback: false,
        });
    }

    let text = std::str::from_utf8(bytes).ok()?;
    Some(DecodedText {
        text: text.to_string(),
        encoding: encoding_rs::UTF_8.name(),
        fallback: false,
    })
}

/// Encoding named in the XML declaration, if any and known.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let caps = DECLARED_ENCODING.captures(window)?;
    Encoding::for_label(caps.get(1)?.as_bytes())
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}
