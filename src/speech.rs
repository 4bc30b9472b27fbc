//! Speech payload handling
//!
//! The text-to-speech endpoint returns raw PCM as base64 text. These helpers turn
//! that payload into a playable WAV container, rejecting payloads that carry no
//! audio before they ever reach the encoder.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use crate::audio::{wav, PcmFormat};
use crate::error::{PcmWavError, Result};

/// MIME type for encoded containers.
pub const WAV_MIME: &str = "audio/wav";

/// Decodes a base64 PCM payload to raw bytes.
///
/// Surrounding whitespace and embedded line breaks are ignored.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(PcmWavError::empty_payload("No audio data returned"));
    }

    let pcm = STANDARD.decode(compact.as_bytes())?;
    if pcm.is_empty() {
        return Err(PcmWavError::empty_payload("Decoded audio payload is empty"));
    }

    Ok(pcm)
}

/// Checks a decoded payload and encodes it.
///
/// Empty payloads are an error. A payload that does not split into whole frames is
/// rejected in strict mode and otherwise encoded as-is with a warning.
pub fn pcm_to_wav(pcm: &[u8], format: &PcmFormat, strict: bool) -> Result<Vec<u8>> {
    if pcm.is_empty() {
        return Err(PcmWavError::empty_payload("No audio data to encode"));
    }

    if strict {
        return wav::encode_strict(format, pcm);
    }

    if !format.is_frame_aligned(pcm.len()) {
        log::warn!(
            "PCM payload of {} bytes is not a multiple of the {}-byte frame size",
            pcm.len(), format.block_align()
        );
    }

    Ok(wav::encode_with(format, pcm))
}

/// Decodes a base64 speech payload into a WAV container.
pub fn decode_speech_payload(payload: &str, format: &PcmFormat) -> Result<Vec<u8>> {
    let pcm = decode_base64(payload)?;
    log::debug!("Decoded {} bytes of PCM ({})", pcm.len(), format);
    pcm_to_wav(&pcm, format, false)
}

/// Renders an encoded container as an `audio/wav` data URL.
pub fn to_data_url(wav: &[u8]) -> String {
    format!("data:{};base64,{}", WAV_MIME, STANDARD.encode(wav))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WavInfo;

    #[test]
    fn test_decode_speech_payload() {
        let payload = STANDARD.encode([0x00u8, 0x01, 0x02, 0x03]);
        let wav = decode_speech_payload(&payload, &PcmFormat::speech()).unwrap();

        assert_eq!(wav.len(), 48);
        assert_eq!(&wav[44..], &[0x00, 0x01, 0x02, 0x03]);

        let info = WavInfo::parse(&wav).unwrap();
        assert_eq!(info.sample_rate, 24000);
        assert_eq!(info.channels, 1);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = decode_speech_payload("", &PcmFormat::speech()).unwrap_err();
        assert!(matches!(err, PcmWavError::EmptyPayload { .. }));

        let err = decode_speech_payload("  \n ", &PcmFormat::speech()).unwrap_err();
        assert!(matches!(err, PcmWavError::EmptyPayload { .. }));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = decode_speech_payload("not*base64!", &PcmFormat::speech()).unwrap_err();
        assert!(matches!(err, PcmWavError::Decode { .. }));
    }

    #[test]
    fn test_wrapped_base64_accepted() {
        let pcm = vec![0x10u8; 120];
        let encoded = STANDARD.encode(&pcm);
        let wrapped = format!("{}\n{}\n", &encoded[..60], &encoded[60..]);
        assert_eq!(decode_base64(&wrapped).unwrap(), pcm);
    }

    #[test]
    fn test_pcm_to_wav_strictness() {
        let stereo = PcmFormat::new(24000, 2);
        assert_eq!(pcm_to_wav(&[0; 6], &stereo, false).unwrap().len(), 50);
        assert!(pcm_to_wav(&[0; 6], &stereo, true).is_err());
        assert!(pcm_to_wav(&[0; 8], &stereo, true).is_ok());

        let err = pcm_to_wav(&[], &stereo, false).unwrap_err();
        assert!(matches!(err, PcmWavError::EmptyPayload { .. }));
    }

    #[test]
    fn test_data_url() {
        let wav = wav::encode(&[0, 0], 24000, 1);
        let url = to_data_url(&wav);

        assert!(url.starts_with("data:audio/wav;base64,"));
        let body = url.trim_start_matches("data:audio/wav;base64,");
        assert_eq!(STANDARD.decode(body).unwrap(), wav);
    }
}
