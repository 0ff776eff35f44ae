//! Zlib payload decompression
//!
//! Binary gateway frames are DEFLATE-compressed. A frame is only complete
//! when it ends with the zlib sync-flush marker `0x0000FFFF`; anything else
//! is reported as incomplete and dropped by the caller. A leading `0x78`
//! byte is a zlib header, stripped before inflation.

use super::DecodeError;
use flate2::{Decompress, FlushDecompress, Status};
use kuracord_common::CompressionMode;

const ZLIB_PREFIX: u8 = 0x78;
const ZLIB_SUFFIX: [u8; 4] = [0x00, 0x00, 0xFF, 0xFF];

const OUTPUT_CHUNK: usize = 16 * 1024;

/// Inflates compressed gateway frames
///
/// In `Stream` mode one inflater survives across messages and every frame
/// continues the connection-wide deflate stream; in `Payload` mode each
/// message is a self-contained stream.
#[derive(Debug)]
pub struct PayloadDecompressor {
    mode: CompressionMode,
    stream: Decompress,
}

impl PayloadDecompressor {
    /// Create a decompressor for the given mode
    #[must_use]
    pub fn new(mode: CompressionMode) -> Self {
        Self {
            mode,
            // the 2-byte zlib header is stripped manually, so the inflater
            // always sees a raw deflate stream
            stream: Decompress::new(false),
        }
    }

    /// Inflate one frame
    pub fn decompress(&mut self, frame: &[u8]) -> Result<Vec<u8>, DecodeError> {
        if frame.len() < 4 || frame[frame.len() - 4..] != ZLIB_SUFFIX {
            return Err(DecodeError::IncompleteFrame);
        }

        let data = if frame.first() == Some(&ZLIB_PREFIX) {
            &frame[2..]
        } else {
            frame
        };

        let mut out = Vec::with_capacity(data.len().max(64) * 4);
        match self.mode {
            CompressionMode::Stream => inflate(&mut self.stream, data, &mut out)?,
            CompressionMode::Payload => {
                let mut oneshot = Decompress::new(false);
                inflate(&mut oneshot, data, &mut out)?;
            }
        }

        Ok(out)
    }
}

/// Run `data` through the inflater until it is fully consumed
fn inflate(z: &mut Decompress, data: &[u8], out: &mut Vec<u8>) -> Result<(), DecodeError> {
    let start = z.total_in();

    loop {
        if out.len() == out.capacity() {
            out.reserve(OUTPUT_CHUNK);
        }

        let consumed = usize::try_from(z.total_in() - start).unwrap_or(data.len());
        let produced = out.len();

        let status = z
            .decompress_vec(&data[consumed.min(data.len())..], out, FlushDecompress::Sync)
            .map_err(DecodeError::Decompression)?;

        if matches!(status, Status::StreamEnd) {
            return Ok(());
        }

        let consumed_after = usize::try_from(z.total_in() - start).unwrap_or(data.len());

        // all input taken and output space left: the inflater is waiting
        // for the next frame
        if consumed_after >= data.len() && out.len() < out.capacity() {
            return Ok(());
        }

        // no progress with input remaining means the frame is corrupt
        if consumed_after == consumed && out.len() == produced && out.len() < out.capacity() {
            return Err(DecodeError::IncompleteFrame);
        }
    }
}
