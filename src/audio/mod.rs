//! Audio Module
//!
//! PCM format description and RIFF/WAVE container encoding.

pub mod format;
pub mod wav;

pub use format::{PcmFormat, BITS_PER_SAMPLE, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
pub use wav::{encode, encode_strict, encode_with, write_header, WavInfo, WAV_HEADER_LEN};
