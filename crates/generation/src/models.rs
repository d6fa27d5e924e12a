use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw image bytes plus their MIME type, as exchanged with the generation
/// backend. The `mime` field travels with the bytes everywhere so a payload
/// can always be re-encoded for display or a follow-up request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub mime: String,
}

impl ImagePayload {
    pub fn new(data: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            data,
            mime: mime.into(),
        }
    }

    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Displayable `data:` URL for the payload.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64())
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Omit the raw bytes; they swamp log output.
        f.debug_struct("ImagePayload")
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

/// The fixed set of ad dimensions offered by the studio. The string form is
/// passed to the generation backend verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Portrait,
    Landscape,
    Vertical,
    Pinterest,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Vertical,
        AspectRatio::Pinterest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Vertical => "4:5",
            AspectRatio::Pinterest => "2:3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1) - General Social Post",
            AspectRatio::Portrait => "Portrait (9:16) - Stories & Reels",
            AspectRatio::Landscape => "Landscape (16:9) - Video & X/Twitter",
            AspectRatio::Vertical => "Vertical (4:5) - Instagram/Facebook Feed",
            AspectRatio::Pinterest => "Pinterest (2:3)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(AspectRatio::Square),
            "9:16" => Ok(AspectRatio::Portrait),
            "16:9" => Ok(AspectRatio::Landscape),
            "4:5" => Ok(AspectRatio::Vertical),
            "2:3" => Ok(AspectRatio::Pinterest),
            other => Err(format!("unknown aspect ratio '{other}'")),
        }
    }
}
