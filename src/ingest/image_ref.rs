use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use serde::{Serialize, Serializer};

pub const DEFAULT_PLACEHOLDER: &str = "/placeholder.svg";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Displayable image reference. Embedded payloads are self-contained `data:` URLs and
/// only come out of the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Placeholder(String),
    Embedded(String),
}

impl ImageRef {
    pub fn placeholder(token: impl Into<String>) -> Self {
        Self::Placeholder(token.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Placeholder(token) => token,
            Self::Embedded(data_url) => data_url,
        }
    }

    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// MIME type declared by an embedded payload.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Placeholder(_) => None,
            Self::Embedded(data_url) => data_url
                .strip_prefix("data:")
                .and_then(|rest| rest.split_once(';'))
                .map(|(mime, _)| mime),
        }
    }
}

impl Default for ImageRef {
    fn default() -> Self {
        Self::placeholder(DEFAULT_PLACEHOLDER)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Encodes raw file bytes as a `data:` URL. The MIME type is sniffed from the content;
/// anything unrecognised is still embedded under a generic type.
pub(crate) fn encode_data_url(bytes: &[u8]) -> ImageRef {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME);
    let payload = general_purpose::STANDARD.encode(bytes);
    ImageRef::Embedded(format!("data:{mime};base64,{payload}"))
}
