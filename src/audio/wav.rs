//! RIFF/WAVE container encoding for raw 16-bit PCM

use std::io::{Cursor, Write};
use std::path::Path;
use hound::WavReader;
use crate::audio::format::{PcmFormat, BITS_PER_SAMPLE};
use crate::error::{PcmWavError, Result};

/// Size of the canonical PCM header preceding the sample payload.
pub const WAV_HEADER_LEN: usize = 44;

const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;

/// Builds the 44-byte header for a payload of `data_len` bytes.
///
/// Size fields are 32-bit and wrap for payloads of 4 GiB or more.
pub fn header_bytes(format: &PcmFormat, data_len: usize) -> [u8; WAV_HEADER_LEN] {
    let data_size = data_len as u32;
    let chunk_size = 36u32.wrapping_add(data_size);

    let mut header = [0u8; WAV_HEADER_LEN];

    // RIFF header
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    header[20..22].copy_from_slice(&FORMAT_PCM.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Wraps interleaved 16-bit little-endian samples in a playable WAV container.
///
/// Total over its input: the payload is copied verbatim and never validated, so a
/// buffer that is not a whole number of frames still yields a well-formed header.
/// The output is always `44 + samples.len()` bytes.
pub fn encode(samples: &[u8], sample_rate: u32, num_channels: u16) -> Vec<u8> {
    encode_with(&PcmFormat::new(sample_rate, num_channels), samples)
}

pub fn encode_with(format: &PcmFormat, samples: &[u8]) -> Vec<u8> {
    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + samples.len());
    wav.extend_from_slice(&header_bytes(format, samples.len()));
    wav.extend_from_slice(samples);
    wav
}

/// Like [`encode_with`], but rejects an invalid format or a payload that does not
/// split into whole frames.
pub fn encode_strict(format: &PcmFormat, samples: &[u8]) -> Result<Vec<u8>> {
    format.validate()?;

    if !format.is_frame_aligned(samples.len()) {
        return Err(PcmWavError::audio(format!(
            "Payload of {} bytes is not a multiple of the {}-byte frame size",
            samples.len(), format.block_align()
        )));
    }

    Ok(encode_with(format, samples))
}

/// Writes only the header, for callers that stream the payload separately.
pub fn write_header<W: Write>(format: &PcmFormat, data_len: usize, out: &mut W) -> Result<()> {
    out.write_all(&header_bytes(format, data_len))
        .map_err(|e| PcmWavError::io(format!("Failed to write WAV header: {}", e)))
}

/// Format fields recovered from an encoded container.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Payload size in bytes.
    pub data_len: usize,
    pub duration_secs: f64,
}

impl WavInfo {
    /// Reads the format fields of a container.
    ///
    /// Containers whose data chunk is not a whole number of frames, as written by
    /// [`encode`] for misaligned payloads, are read from the canonical 44-byte header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        match WavReader::new(Cursor::new(bytes)) {
            Ok(reader) => Ok(Self::from_spec(reader.spec(), reader.len())),
            Err(hound::Error::FormatError(reason)) => Self::from_canonical_header(bytes)
                .ok_or_else(|| PcmWavError::Audio {
                    message: format!("Cannot read WAV header: Ill-formed WAVE file: {}", reason)
                }),
            Err(e) => Err(PcmWavError::Audio {
                message: format!("Cannot read WAV header: {}", e)
            }),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let bytes = std::fs::read(path)
            .map_err(|e| PcmWavError::Audio {
                message: format!("Cannot open audio file {}: {}", path.display(), e)
            })?;

        Self::parse(&bytes)
    }

    fn from_spec(spec: hound::WavSpec, num_samples: u32) -> Self {
        let bytes_per_sample = (spec.bits_per_sample as usize).div_ceil(8);
        let data_len = num_samples as usize * bytes_per_sample;
        let format = PcmFormat::new(spec.sample_rate, spec.channels);

        Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            data_len,
            duration_secs: format.duration_secs(data_len),
        }
    }

    /// Decodes the fixed layout produced by [`header_bytes`]; `None` for anything else.
    fn from_canonical_header(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..WAV_HEADER_LEN)?;
        let u16_at = |at: usize| u16::from_le_bytes([header[at], header[at + 1]]);
        let u32_at = |at: usize| u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]]);

        let canonical = &header[0..4] == b"RIFF"
            && &header[8..12] == b"WAVE"
            && &header[12..16] == b"fmt "
            && u32_at(16) == FMT_CHUNK_LEN
            && u16_at(20) == FORMAT_PCM
            && &header[36..40] == b"data";
        if !canonical {
            return None;
        }

        let format = PcmFormat::new(u32_at(24), u16_at(22));
        let data_len = u32_at(40) as usize;

        Some(Self {
            sample_rate: format.sample_rate,
            channels: format.channels,
            bits_per_sample: u16_at(34),
            data_len,
            duration_secs: format.duration_secs(data_len),
        })
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels)
    }
}

impl std::fmt::Display for WavInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f, "{}Hz, {}ch, {}-bit, {} bytes, {:.3}s",
            self.sample_rate, self.channels, self.bits_per_sample, self.data_len, self.duration_secs
        )
    }
}
