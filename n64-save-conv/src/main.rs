// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! n64-save-conv - Converts an N64 save file between the layouts used by
//! real cartridges, emulators and flash carts.
//!
//! Reads the input, works out the conversion recipe, resizes/relocates and
//! byte swaps the data, then writes a new, timestamped, file alongside the
//! input (or into `--output`).

mod args;
mod config;
mod file;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{LevelFilter, info};
use std::io::Write;

use n64_save_common::{ConversionRequest, Format, Runtime, convert};

use args::Args;
use file::{load_save_file, write_save_file};

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose());

    // If `list` is set, we don't need to process any other arguments, just
    // output the registry and exit.
    if args.list() {
        list_registry();
        return Ok(());
    }

    // Create configuration
    let config = args
        .gen_config()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Validate it
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation error: {}", e))?;

    info!("Starting conversion for: {}", config.input.display());
    let data = load_save_file(&config.input)?;

    let file_name = config
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Invalid input file name: {}", config.input.display()))?;

    let request = ConversionRequest {
        data: &data,
        file_name: &file_name,
        key: config.key,
        swap_choice: config.swap_choice,
        pad_trim: config.pad_trim,
        prefix: &config.prefix,
    };
    let output = convert(&request);

    let path = write_save_file(
        &config.output_dir,
        &output.file_name,
        &output.data,
        config.overwrite,
    )?;

    println!(
        "- Converted {} ({} bytes) to {} ({} bytes)",
        config.input.display(),
        data.len(),
        path.display(),
        output.data.len()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn list_registry() {
    for line in registry_lines() {
        println!("{line}");
    }
}

/// The runtimes, formats and combined save offsets printed by `--list`.
fn registry_lines() -> Vec<String> {
    let mut lines = vec!["Runtimes:".to_string()];
    for runtime in Runtime::iter() {
        lines.push(format!("  {:<8} {}", runtime.short_name(), runtime.label()));
    }

    lines.push(String::new());
    lines.push("Save formats:".to_string());
    for format in Format::iter() {
        lines.push(format!(
            "  {:<8} {:<24} {:>7} bytes",
            format.short_name(),
            format.label(),
            format.size_bytes()
        ));
    }

    lines.push(String::new());
    lines.push("Offsets within the combined save:".to_string());
    for format in Format::iter() {
        if let Some(offset) = format.combined_offset() {
            lines.push(format!("  {:<8} {:>7}", format.short_name(), offset));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lines() {
        let lines = registry_lines();

        for runtime in Runtime::iter() {
            assert!(lines.iter().any(|l| l.contains(runtime.label())));
        }
        assert!(lines.iter().any(|l| l.contains("Retroarch Save (.srm)") && l.contains("296960")));

        let start = lines
            .iter()
            .position(|l| l == "Offsets within the combined save:")
            .unwrap();
        let offsets = &lines[start + 1..];
        assert_eq!(
            offsets,
            [
                "  eep            0",
                "  sra       133120",
                "  fla       165888",
                "  mpk         2048",
            ]
        );
    }
}
