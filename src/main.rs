//! pcmwav - PCM to WAV converter

use clap::Parser;
use std::process;
use pcmwav::convert::BatchConverter;
use pcmwav::{init_logging, Args, Config, PcmWavError, Result, WavInfo};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when some inputs failed but all were reported.
fn run(args: Args) -> Result<bool> {
    if args.verbose {
        println!("{}", pcmwav::get_library_info());
        println!();
    }

    if let Some(path) = &args.write_default_config {
        Config::create_default_config(path)?;
        println!("Wrote default config: {}", path.display());
        return Ok(true);
    }

    let inspect = args.inspect;
    let config = Config::from_args_and_config(args)?;

    if config.inputs.is_empty() {
        return Err(PcmWavError::config("No input files given (use -i/--input)"));
    }

    if inspect {
        return run_inspect(&config);
    }

    println!("=== pcmwav ===");
    println!("Format: {}", config.format());
    println!("Inputs: {}", config.inputs.len());
    if config.verbose() {
        println!("Jobs: {}", config.jobs());
        println!("Base64 input: {}", config.conversion.base64_input);
        println!("Strict: {}", config.conversion.strict);
    }
    println!("==============\n");

    let converter = BatchConverter::new(config.clone())?;
    let outcomes = converter.convert_all()?;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                println!("{} -> {} ({:.2}s)", outcome.input.display(), outcome.output.display(), report.duration_secs);
                if config.verbose() {
                    println!("  Payload: {} bytes, {} frames, {:.2}ms",
                             report.payload_bytes, report.frames, report.processing_time_ms);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {}", outcome.input.display(), e);
            }
        }
    }

    println!("\nConverted {}/{}", outcomes.len() - failed, outcomes.len());
    Ok(failed == 0)
}

fn run_inspect(config: &Config) -> Result<bool> {
    let mut ok = true;
    for input in &config.inputs {
        match WavInfo::from_file(input) {
            Ok(info) => println!("{}: {}", input.display(), info),
            Err(e) => {
                ok = false;
                eprintln!("{}: {}", input.display(), e);
            }
        }
    }
    Ok(ok)
}
