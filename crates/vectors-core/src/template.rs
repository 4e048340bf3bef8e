//! Claims template duplication and corruption
//!
//! Negative-test vectors start from a known-good PSA claims template. The
//! template is copied, one claim in the copy is deliberately broken, and the
//! copy is rewritten with four-space indentation. The original is never
//! touched.

use crate::error::FixtureError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Claim holding the challenge nonce
pub const NONCE_CLAIM: &str = "psa-nonce";
/// Claim holding the list of software components
pub const SW_COMPONENTS_CLAIM: &str = "psa-software-components";
/// Per-component measurement field
pub const MEASUREMENT_FIELD: &str = "measurement-value";

/// Hex seed for the extra nonce. The trailing odd nibble is dropped on
/// decode, leaving 32 bytes.
pub const EXTRA_NONCE_SEED: &str =
    "01aabbccdd00112233aabbccdd00112233aabbccdd00112233aabbccdd0011223";

/// Copy `src` to `dst` byte for byte.
pub fn duplicate(src: &Path, dst: &Path) -> Result<(), FixtureError> {
    std::fs::copy(src, dst).map_err(|e| FixtureError::io(src, e))?;
    debug!(from = %src.display(), to = %dst.display(), "duplicated template");
    Ok(())
}

/// Parse a claims template.
///
/// Returns `None` for a JSON `null` document. A blank file is not valid JSON
/// and fails like any other parse error.
pub fn load(path: &Path) -> Result<Option<Value>, FixtureError> {
    let contents = std::fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((!value.is_null()).then_some(value))
}

/// Render a document with four-space indentation and no trailing newline.
///
/// Non-ASCII characters are written as `\uXXXX` escapes, surrogate pairs
/// included, so the output is plain ASCII.
pub fn render(doc: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut serializer)?;
    Ok(escape_non_ascii(&String::from_utf8_lossy(&buf)).into_bytes())
}

// Outside of string literals serde_json only emits ASCII, so escaping every
// non-ASCII char in the rendered text only touches string contents.
fn escape_non_ascii(rendered: &str) -> String {
    if rendered.is_ascii() {
        return rendered.to_string();
    }
    let mut out = String::with_capacity(rendered.len() + 16);
    let mut units = [0u16; 2];
    for c in rendered.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}

/// Replace the contents of `path` with `doc`.
pub fn store(path: &Path, doc: &Value) -> Result<(), FixtureError> {
    let bytes = render(doc).map_err(|source| FixtureError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes).map_err(|e| FixtureError::io(path, e))
}

/// Second nonce for the multi-nonce vector, base64 encoded.
pub fn derive_extra_nonce() -> String {
    STANDARD.encode(decode_hex_prefix(EXTRA_NONCE_SEED))
}

/// Decode pairs of hex digits, dropping an unpaired trailing digit.
fn decode_hex_prefix(seed: &str) -> Vec<u8> {
    let even = seed.len() - seed.len() % 2;
    // The seed is a compile-time constant of valid hex digits.
    hex::decode(&seed[..even]).unwrap_or_default()
}

/// Turn the scalar nonce into `[original, extra]`.
pub fn corrupt_nonce(doc: &mut Value, extra: &str) -> Result<(), FixtureError> {
    let nonce = doc
        .get_mut(NONCE_CLAIM)
        .ok_or_else(|| FixtureError::MissingField {
            field: NONCE_CLAIM.to_string(),
        })?;

    if nonce.as_str() == Some(extra) {
        return Err(FixtureError::DegenerateCorruption {
            field: NONCE_CLAIM.to_string(),
        });
    }

    let original = nonce.take();
    *nonce = Value::Array(vec![original, Value::String(extra.to_string())]);
    Ok(())
}

/// Overwrite the first character of the first software component's
/// measurement value.
///
/// The replacement is `'H'`, or `'G'` when the value already starts with
/// `'H'`, so the claim always changes.
pub fn corrupt_first_measurement(doc: &mut Value) -> Result<(), FixtureError> {
    let field = format!("{SW_COMPONENTS_CLAIM}[0].{MEASUREMENT_FIELD}");

    let components = doc
        .get_mut(SW_COMPONENTS_CLAIM)
        .ok_or_else(|| FixtureError::MissingField {
            field: SW_COMPONENTS_CLAIM.to_string(),
        })?;
    let first = components
        .as_array_mut()
        .ok_or_else(|| FixtureError::InvalidField {
            field: SW_COMPONENTS_CLAIM.to_string(),
            reason: "expected an array".to_string(),
        })?
        .first_mut()
        .ok_or_else(|| FixtureError::InvalidField {
            field: SW_COMPONENTS_CLAIM.to_string(),
            reason: "array is empty".to_string(),
        })?;
    let measurement = first
        .get_mut(MEASUREMENT_FIELD)
        .ok_or_else(|| FixtureError::MissingField {
            field: field.clone(),
        })?;
    let current = measurement
        .as_str()
        .ok_or_else(|| FixtureError::InvalidField {
            field: field.clone(),
            reason: "expected a string".to_string(),
        })?;

    let mut chars = current.chars();
    let head = chars.next().ok_or_else(|| FixtureError::InvalidField {
        field: field.clone(),
        reason: "measurement is empty".to_string(),
    })?;
    let replacement = if head == 'H' { 'G' } else { 'H' };

    let mut distorted = String::with_capacity(current.len());
    distorted.push(replacement);
    distorted.push_str(chars.as_str());
    *measurement = Value::String(distorted);
    Ok(())
}
