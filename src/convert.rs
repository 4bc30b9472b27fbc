//! File conversion pipeline
//!
//! Reads PCM payloads from disk (raw or base64 text), wraps them in WAV containers
//! and writes the results. Independent files are converted on a rayon pool.

use std::path::{Path, PathBuf};
use std::time::Instant;
use rayon::prelude::*;
use crate::audio::PcmFormat;
use crate::config::Config;
use crate::error::{PcmWavError, Result};
use crate::speech;

#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub payload_bytes: usize,
    pub frames: usize,
    pub duration_secs: f64,
    pub processing_time_ms: f64,
}

#[derive(Debug)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub result: Result<ConversionReport>,
}

impl ConversionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct BatchConverter {
    config: Config,
    format: PcmFormat,
}

impl BatchConverter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let format = config.format();

        if config.verbose() {
            log::info!("Converter ready: {}, {} job(s)", format, config.jobs());
        }

        Ok(Self { config, format })
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Destination for `input`: the explicit output path, a file in the output
    /// directory, or a `.wav` sibling of the input.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        if let Some(output) = &self.config.output_path {
            return output.clone();
        }

        let file_name = input.with_extension("wav");
        match (&self.config.output_dir, file_name.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => file_name,
        }
    }

    /// Loads the PCM payload of one input, decoding base64 text when configured.
    pub fn read_payload(&self, input: &Path) -> Result<Vec<u8>> {
        if self.config.conversion.base64_input {
            let text = std::fs::read_to_string(input)
                .map_err(|e| PcmWavError::io(format!("Cannot read {}: {}", input.display(), e)))?;
            return speech::decode_base64(&text);
        }

        let pcm = std::fs::read(input)
            .map_err(|e| PcmWavError::io(format!("Cannot read {}: {}", input.display(), e)))?;
        if pcm.is_empty() {
            return Err(PcmWavError::empty_payload(format!("{} contains no audio data", input.display())));
        }
        Ok(pcm)
    }

    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let start_time = Instant::now();

        let pcm = self.read_payload(input)?;
        let wav = speech::pcm_to_wav(&pcm, &self.format, self.config.conversion.strict)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PcmWavError::io(format!("Cannot create output directory: {}", e)))?;
            }
        }

        std::fs::write(output, &wav)
            .map_err(|e| PcmWavError::io(format!("Cannot write {}: {}", output.display(), e)))?;

        log::debug!("Wrote {} ({} bytes)", output.display(), wav.len());

        Ok(ConversionReport {
            payload_bytes: pcm.len(),
            frames: self.format.frame_count(pcm.len()),
            duration_secs: self.format.duration_secs(pcm.len()),
            processing_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Converts every configured input. Outcomes are returned in input order.
    pub fn convert_all(&self) -> Result<Vec<ConversionOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads())
            .build()
            .map_err(|e| PcmWavError::config(format!("Cannot build worker pool: {}", e)))?;

        let outcomes: Vec<ConversionOutcome> = pool.install(|| {
            self.config.inputs.par_iter()
                .map(|input| {
                    let output = self.output_path_for(input);
                    let result = self.convert_file(input, &output);
                    if let Err(e) = &result {
                        log::warn!("Failed to convert {}: {}", input.display(), e);
                    }
                    ConversionOutcome { input: input.clone(), output, result }
                })
                .collect()
        });

        Ok(outcomes)
    }
}
