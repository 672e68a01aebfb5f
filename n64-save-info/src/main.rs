/// n64-save-info
///
/// Reports what an N64 save file is: its detected format, whether its size
/// matches that format's canonical size, and whether it is normally byte
/// swapped.
///
/// Given `--source` and `--target` it also resolves the conversion recipe
/// n64-save-conv would use, without converting anything.

// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

mod args;
mod report;

use anyhow::Result;
use chrono::Local;
use log::LevelFilter;
use std::io::Write;

use args::parse_args;
use report::{ReportOptions, load_report, print_report};

fn main() -> Result<()> {
    let args = parse_args().map_err(|e| anyhow::anyhow!(e))?;

    init_logging(args.verbose);

    let options = ReportOptions {
        source_format: args.source_type,
        source_runtime: args.source,
        target_runtime: args.target,
        target_format: args.target_type,
        swap_choice: args.swap,
    };
    let report = load_report(&args.file, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("N64 Save File Information");
        println!("=========================");
        print_report(&report);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
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
        .target(env_logger::Target::Stderr)
        .init();
}
