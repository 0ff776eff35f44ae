//! Frame decoding
//!
//! Turns raw socket frames into gateway payloads. Binary frames are
//! zlib-compressed and go through the decompressor; text frames are parsed
//! directly. Decode failures are reported as values so the session can drop
//! the frame without tearing down the connection.

mod decompressor;

pub use decompressor::PayloadDecompressor;

use crate::protocol::GatewayPayload;
use kuracord_common::CompressionMode;

/// A raw frame off the socket
#[derive(Debug, Clone)]
pub enum Frame {
    /// A UTF-8 text frame carrying JSON
    Text(String),
    /// A compressed binary frame
    Binary(Vec<u8>),
}

/// Frame decode errors, all scoped to the offending frame
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The inflater rejected the frame
    #[error("Payload decompression failed")]
    Decompression(#[source] flate2::DecompressError),

    /// The frame does not end with the zlib flush marker
    #[error("Compressed frame is missing its flush marker")]
    IncompleteFrame,

    /// Decompressed bytes were not valid UTF-8
    #[error("Decompressed payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The JSON did not parse as a gateway payload
    #[error("Invalid gateway payload")]
    Json(#[from] serde_json::Error),
}

/// Decodes socket frames into typed gateway payloads
#[derive(Debug)]
pub struct PayloadCodec {
    decompressor: PayloadDecompressor,
}

impl PayloadCodec {
    /// Create a codec for the given compression mode
    #[must_use]
    pub fn new(mode: CompressionMode) -> Self {
        Self {
            decompressor: PayloadDecompressor::new(mode),
        }
    }

    /// Decode one frame
    pub fn decode(&mut self, frame: Frame) -> Result<GatewayPayload, DecodeError> {
        let text = match frame {
            Frame::Text(text) => text,
            Frame::Binary(bytes) => {
                let inflated = self.decompressor.decompress(&bytes)?;
                String::from_utf8(inflated)?
            }
        };

        Ok(GatewayPayload::from_json(&text)?)
    }
}
