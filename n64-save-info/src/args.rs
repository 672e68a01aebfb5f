// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Command line arguments for n64-save-info.

use clap::Parser;
use std::path::PathBuf;

use n64_save_common::args::{parse_format, parse_runtime, parse_swap_choice};
use n64_save_common::{Format, Runtime, SwapChoice};

#[derive(Parser, Debug)]
#[command(name = "n64-save-info")]
#[command(about = "N64 save file information")]
#[command(version)]
#[command(
    after_help = "Give --source and --target to also see how the file would be converted"
)]
pub struct Args {
    /// Save file (.eep, .sra, .fla, .mpk or .srm)
    pub file: PathBuf,

    /// Save format, if it can't be detected from the file extension
    #[arg(long, value_parser = parse_format)]
    pub source_type: Option<Format>,

    /// Where the save came from (native, pj64, ra, wii)
    #[arg(long, value_parser = parse_runtime, requires = "target")]
    pub source: Option<Runtime>,

    /// Where the save would go (native, pj64, ra, wii)
    #[arg(long, value_parser = parse_runtime, requires = "source")]
    pub target: Option<Runtime>,

    /// Save format to convert to (default: the first usual target format)
    #[arg(long, value_parser = parse_format, requires = "target")]
    pub target_type: Option<Format>,

    /// Byte swap choice to report on (auto, 2, 4)
    #[arg(long, value_parser = parse_swap_choice, default_value = "auto")]
    pub swap: SwapChoice,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn parse_args() -> Result<Args, String> {
    let args = Args::parse();

    // Validate file exists
    if !args.file.exists() {
        return Err(format!("Save file does not exist: {}", args.file.display()));
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_and_target_go_together() {
        assert!(Args::try_parse_from(["n64-save-info", "a.sra"]).is_ok());
        assert!(Args::try_parse_from(["n64-save-info", "a.sra", "--source", "pj64"]).is_err());
        assert!(Args::try_parse_from(["n64-save-info", "a.sra", "--target", "ra"]).is_err());
        assert!(
            Args::try_parse_from(["n64-save-info", "a.sra", "--target-type", "srm"]).is_err()
        );

        let args = Args::try_parse_from([
            "n64-save-info",
            "a.sra",
            "--source",
            "pj64",
            "--target",
            "ra",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.source, Some(Runtime::Project64));
        assert_eq!(args.target, Some(Runtime::RetroArch));
        assert_eq!(args.swap, SwapChoice::Automatic);
        assert!(args.json);
    }
}
