//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum PcmWavError {
    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Empty payload: {message}")]
    EmptyPayload { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl PcmWavError {
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn decode<S: Into<String>>(msg: S) -> Self { Self::Decode { message: msg.into() } }
    pub fn empty_payload<S: Into<String>>(msg: S) -> Self { Self::EmptyPayload { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, PcmWavError>;

impl From<std::io::Error> for PcmWavError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<base64::DecodeError> for PcmWavError {
    fn from(err: base64::DecodeError) -> Self { Self::decode(format!("base64: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PcmWavError::audio("test");
        assert!(e.to_string().contains("Audio"));

        let e = PcmWavError::empty_payload("no audio returned");
        assert_eq!(e.to_string(), "Empty payload: no audio returned");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pcm");
        let e: PcmWavError = io.into();
        assert!(matches!(e, PcmWavError::Io { .. }));
        assert!(e.to_string().contains("missing.pcm"));
    }
}
