//! References to the image being edited.
//!
//! A [`SourceImage`] is opaque to the session: it is stored as given and
//! only read when an export runs. Cloning is cheap (shared buffers), and
//! nothing in this crate ever writes through it.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::export::ExportError;

/// The image a session edits.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceImage {
    /// Encoded file contents already in memory.
    Bytes(Arc<[u8]>),
    /// A file on the local file system, read at export time.
    File(PathBuf),
    /// A `data:` URI with a base64 payload, as produced by `FileReader`.
    DataUrl(Arc<str>),
}

impl SourceImage {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        SourceImage::Bytes(bytes.into())
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        SourceImage::File(path.into())
    }

    pub fn from_data_url(url: impl Into<Arc<str>>) -> Self {
        SourceImage::DataUrl(url.into())
    }

    /// Encoded bytes of the image.
    ///
    /// In-memory sources are borrowed; files are read and data URLs decoded
    /// into a fresh buffer.
    pub fn load(&self) -> Result<Cow<'_, [u8]>, ExportError> {
        match self {
            SourceImage::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
            SourceImage::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| ExportError::IoError(format!("{}: {}", path.display(), e))),
            SourceImage::DataUrl(url) => decode_data_url(url).map(Cow::Owned),
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceImage::Bytes(_) => "bytes",
            SourceImage::File(_) => "file",
            SourceImage::DataUrl(_) => "data_url",
        }
    }
}

impl From<Vec<u8>> for SourceImage {
    fn from(bytes: Vec<u8>) -> Self {
        SourceImage::Bytes(bytes.into())
    }
}

impl From<PathBuf> for SourceImage {
    fn from(path: PathBuf) -> Self {
        SourceImage::File(path)
    }
}

/// Decode the payload of a `data:[<mime>][;base64],<payload>` URI.
///
/// Only base64 payloads are accepted; image data is never sent
/// percent-encoded in practice.
fn decode_data_url(url: &str) -> Result<Vec<u8>, ExportError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::InvalidDataUrl("missing ',' separator".to_string()))?;

    if !header.split(';').any(|param| param.eq_ignore_ascii_case("base64")) {
        return Err(ExportError::InvalidDataUrl(
            "only base64 payloads are supported".to_string(),
        ));
    }

    // Some encoders wrap long payloads
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ExportError::InvalidDataUrl(e.to_string()))
}
