//! PCM format descriptor

use crate::error::{PcmWavError, Result};

/// Bit depth carried by every buffer this crate handles.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes in one 16-bit sample.
pub const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;

/// Sample rate of the speech endpoint's PCM responses.
pub const SPEECH_SAMPLE_RATE: u32 = 24000;

/// Channel count of the speech endpoint's PCM responses.
pub const SPEECH_CHANNELS: u16 = 1;

/// Interleaved 16-bit little-endian PCM layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self { sample_rate, channels }
    }

    /// 24 kHz mono, as returned by the text-to-speech endpoint.
    pub fn speech() -> Self {
        Self::new(SPEECH_SAMPLE_RATE, SPEECH_CHANNELS)
    }

    pub fn bits_per_sample(&self) -> u16 {
        BITS_PER_SAMPLE
    }

    /// Bytes per frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels.wrapping_mul(BYTES_PER_SAMPLE)
    }

    /// Bytes of payload per second of playback.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(self.block_align() as u32)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(PcmWavError::audio("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(PcmWavError::audio("Channel count cannot be 0"));
        }

        Ok(())
    }

    pub fn is_frame_aligned(&self, payload_len: usize) -> bool {
        match self.block_align() {
            0 => payload_len == 0,
            align => payload_len % align as usize == 0,
        }
    }

    /// Number of complete frames in a payload; a trailing partial frame is not counted.
    pub fn frame_count(&self, payload_len: usize) -> usize {
        match self.block_align() {
            0 => 0,
            align => payload_len / align as usize,
        }
    }

    pub fn duration_secs(&self, payload_len: usize) -> f64 {
        match self.byte_rate() {
            0 => 0.0,
            rate => payload_len as f64 / rate as f64,
        }
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::speech()
    }
}

impl std::fmt::Display for PcmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Hz, {}ch, {}-bit", self.sample_rate, self.channels, BITS_PER_SAMPLE)
    }
}
