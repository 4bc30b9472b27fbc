//! Configuration management for PCM conversion

use crate::audio::{PcmFormat, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
use crate::error::{PcmWavError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_SAMPLE_RATE: u32 = 192000;
pub const MAX_CHANNELS: u16 = 8;
pub const DEFAULT_JOBS: usize = 4;
pub const MAX_JOBS: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub base64_input: bool,
    pub strict: bool,
    pub jobs: usize,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_path: None,
            output_dir: None,
            audio: AudioConfig::default(),
            conversion: ConversionConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: SPEECH_SAMPLE_RATE,
            channels: SPEECH_CHANNELS,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base64_input: false,
            strict: false,
            jobs: DEFAULT_JOBS,
            verbose: false,
        }
    }
}

impl Config {
    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.audio.sample_rate, self.audio.channels)
    }

    pub fn jobs(&self) -> usize {
        self.conversion.jobs
    }

    /// Worker threads actually used: the configured job count, capped at 4x logical CPU cores.
    pub fn worker_threads(&self) -> usize {
        self.conversion.jobs.min(num_cpus::get() * 4).max(1)
    }

    pub fn verbose(&self) -> bool {
        self.conversion.verbose
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pcmwav", about = "Wrap raw 16-bit PCM in WAV containers", version, author)]
pub struct Args {
    #[arg(short = 'i', long = "input", num_args = 1.., help = "Input file(s): raw PCM, or base64 text with --base64")]
    pub inputs: Vec<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Output WAV path (single input only)")]
    pub output: Option<PathBuf>,

    #[arg(short = 'd', long = "output-dir", help = "Directory for output WAV files")]
    pub output_dir: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", help = "PCM sample rate in Hz [default: 24000]")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'n', long = "channels", help = "Interleaved channel count [default: 1]")]
    pub channels: Option<u16>,

    #[arg(short = 'b', long = "base64", help = "Inputs hold base64 text instead of raw bytes")]
    pub base64: bool,

    #[arg(long = "strict", help = "Reject payloads that are not a whole number of frames")]
    pub strict: bool,

    #[arg(short = 'j', long = "jobs", help = "Parallel conversion jobs [default: 4]")]
    pub jobs: Option<usize>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "inspect", help = "Print the header fields of existing WAV inputs")]
    pub inspect: bool,

    #[arg(long = "write-default-config", help = "Write a default config file to the given path and exit")]
    pub write_default_config: Option<PathBuf>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if !args.inputs.is_empty() {
            config.inputs = args.inputs;
        }
        if args.output.is_some() {
            config.output_path = args.output;
        }
        if args.output_dir.is_some() {
            config.output_dir = args.output_dir;
        }
        if let Some(sample_rate) = args.sample_rate {
            config.audio.sample_rate = sample_rate;
        }
        if let Some(channels) = args.channels {
            config.audio.channels = channels;
        }
        if let Some(jobs) = args.jobs {
            config.conversion.jobs = jobs;
        }
        config.conversion.base64_input |= args.base64;
        config.conversion.strict |= args.strict;
        config.conversion.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PcmWavError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| PcmWavError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(PcmWavError::config("Sample rate must be greater than 0"));
        }
        if self.audio.sample_rate > MAX_SAMPLE_RATE {
            return Err(PcmWavError::config(format!("Sample rate cannot exceed {} Hz", MAX_SAMPLE_RATE)));
        }

        if self.audio.channels == 0 || self.audio.channels > MAX_CHANNELS {
            return Err(PcmWavError::config(format!("Channel count must be between 1 and {}", MAX_CHANNELS)));
        }

        if self.conversion.jobs == 0 {
            return Err(PcmWavError::config("Job count must be greater than 0"));
        }
        if self.conversion.jobs > MAX_JOBS {
            return Err(PcmWavError::config(format!("Job count cannot exceed {}", MAX_JOBS)));
        }

        if self.output_path.is_some() && self.inputs.len() > 1 {
            return Err(PcmWavError::config("--output can only be used with a single input"));
        }
        if self.output_path.is_some() && self.output_dir.is_some() {
            return Err(PcmWavError::config("--output and --output-dir are mutually exclusive"));
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PcmWavError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PcmWavError::config(format!("Failed to write config file: {}", e)))
    }

    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("pcmwav").chain(argv.iter().copied()))
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.audio.sample_rate, 24000);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.format(), PcmFormat::speech());
        assert!(!config.conversion.strict);
        assert_eq!(config.jobs(), DEFAULT_JOBS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_job_limit_is_machine_independent() {
        let mut config = Config::default();

        config.conversion.jobs = MAX_JOBS;
        assert!(config.validate().is_ok());
        assert!(config.worker_threads() <= num_cpus::get() * 4);
        assert!(config.worker_threads() >= 1);

        config.conversion.jobs = MAX_JOBS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_written_default_config_has_fixed_jobs() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("default.toml");
        Config::create_default_config(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("jobs = 4"));
        assert!(Config::from_file(&config_path).unwrap().validate().is_ok());
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[audio]\nsample_rate = 16000\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.jobs(), DEFAULT_JOBS);
        assert!(!config.conversion.strict);
        assert!(config.inputs.is_empty());

        let empty_path = temp_dir.path().join("empty.toml");
        std::fs::write(&empty_path, "").unwrap();
        assert_eq!(Config::from_file(&empty_path).unwrap().format(), PcmFormat::speech());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.audio.sample_rate = 0;
        assert!(config.validate().is_err());
        config.audio.sample_rate = 192001;
        assert!(config.validate().is_err());
        config.audio.sample_rate = 24000;

        config.audio.channels = 0;
        assert!(config.validate().is_err());
        config.audio.channels = 9;
        assert!(config.validate().is_err());
        config.audio.channels = 2;

        config.conversion.jobs = 0;
        assert!(config.validate().is_err());
        config.conversion.jobs = 1;

        config.inputs = vec![PathBuf::from("a.pcm"), PathBuf::from("b.pcm")];
        config.output_path = Some(PathBuf::from("out.wav"));
        assert!(config.validate().is_err());
        config.inputs.truncate(1);
        assert!(config.validate().is_ok());

        config.output_dir = Some(PathBuf::from("out"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.audio.sample_rate = 16000;
        config.conversion.strict = true;

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded_config.audio.sample_rate, 16000);
        assert!(loaded_config.conversion.strict);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "audio = 3").unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(matches!(err, PcmWavError::Config { .. }));
    }

    #[test]
    fn test_args_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut file_config = Config::default();
        file_config.audio.sample_rate = 16000;
        file_config.audio.channels = 2;
        file_config.conversion.jobs = 1;
        file_config.save_to_file(&config_path).unwrap();

        let config = Config::from_args_and_config(args(&[
            "-c", config_path.to_str().unwrap(),
            "-i", "speech.pcm",
            "-r", "48000",
            "--base64",
        ])).unwrap();

        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.channels, 2);
        assert_eq!(config.jobs(), 1);
        assert!(config.conversion.base64_input);
        assert_eq!(config.inputs, vec![PathBuf::from("speech.pcm")]);
    }

    #[test]
    fn test_args_without_config_use_speech_defaults() {
        let config = Config::from_args_and_config(args(&["-i", "a.pcm", "b.pcm"])).unwrap();
        assert_eq!(config.format(), PcmFormat::speech());
        assert_eq!(config.inputs.len(), 2);
    }

    #[test]
    fn test_args_reject_output_with_many_inputs() {
        let result = Config::from_args_and_config(args(&["-i", "a.pcm", "b.pcm", "-o", "out.wav"]));
        assert!(result.is_err());
    }
}
