// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Command line arguments for n64-save-conv.

use clap::Parser;
use std::path::PathBuf;

use n64_save_common::args::{parse_format, parse_prefix, parse_runtime, parse_swap_choice};
use n64_save_common::{
    ConversionKey, DEFAULT_PREFIX, Format, Runtime, SwapChoice, valid_target_formats,
};

use crate::config::Config;

#[derive(Parser, Debug)]
#[clap(
    name = "n64-save-conv",
    about = "Converts N64 save files between cartridge, emulator and flash cart layouts",
    version
)]
pub struct Args {
    /// Save file to convert (.eep, .sra, .fla, .mpk or .srm)
    #[clap(long, short, required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Where the save came from (native, pj64, ra, wii)
    #[clap(long, value_parser = parse_runtime, required_unless_present = "list")]
    source: Option<Runtime>,

    /// Save format of the input (eep, sra, fla, mpk, srm).  Detected from
    /// the file extension if not given
    #[clap(long, value_parser = parse_format)]
    source_type: Option<Format>,

    /// Where the save is going (native, pj64, ra, wii)
    #[clap(long, value_parser = parse_runtime, required_unless_present = "list")]
    target: Option<Runtime>,

    /// Save format to produce.  Defaults to the first format that makes
    /// sense for the source and target
    #[clap(long, value_parser = parse_format)]
    target_type: Option<Format>,

    /// Byte swap (auto, 2, 4).  2 or 4 force a swap of that size
    #[clap(long, value_parser = parse_swap_choice, default_value = "auto")]
    swap: SwapChoice,

    /// Don't pad or trim to the target format's size
    #[clap(long)]
    no_pad_trim: bool,

    /// Output directory (default: the input file's directory)
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Prefix for the output file name
    #[clap(long, value_parser = parse_prefix, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Overwrite an existing output file
    #[clap(long)]
    overwrite: bool,

    /// Enable debug logging
    #[clap(long, short)]
    verbose: bool,

    /// List supported runtimes and formats, then exit
    #[clap(long)]
    list: bool,
}

impl Args {
    pub fn list(&self) -> bool {
        self.list
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Fills in detected and defaulted values, producing the configuration
    /// for the conversion.
    pub fn gen_config(&self) -> Result<Config, String> {
        let input = self.input.clone().ok_or("Missing --input")?;
        let source_runtime = self.source.ok_or("Missing --source")?;
        let target_runtime = self.target.ok_or("Missing --target")?;

        let source_format = match self.source_type {
            Some(format) => format,
            None => Format::from_path(&input).map_err(|e| {
                format!("{} - specify the format with --source-type", e)
            })?,
        };

        let target_format = match self.target_type {
            Some(format) => format,
            None => valid_target_formats(source_format, target_runtime)
                .first()
                .copied()
                .unwrap_or(source_format),
        };

        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        Ok(Config {
            input,
            key: ConversionKey::new(source_runtime, source_format, target_runtime, target_format),
            swap_choice: self.swap,
            pad_trim: !self.no_pad_trim,
            output_dir,
            prefix: self.prefix.clone(),
            overwrite: self.overwrite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("n64-save-conv").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_detects_source_type_and_defaults_target_type() {
        let args = parse(&["-i", "saves/game.sra", "--source", "pj64", "--target", "ra"]);
        let config = args.gen_config().unwrap();
        assert_eq!(
            config.key,
            ConversionKey::new(
                Runtime::Project64,
                Format::Sram,
                Runtime::RetroArch,
                Format::Combined
            )
        );
        assert_eq!(config.output_dir, PathBuf::from("saves"));
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.swap_choice, SwapChoice::Automatic);
        assert!(config.pad_trim);
    }

    #[test]
    fn test_combined_source_defaults_to_first_label() {
        let args = parse(&["-i", "game.srm", "--source", "ra", "--target", "wii"]);
        let config = args.gen_config().unwrap();
        assert_eq!(config.key.target_format, Format::ControllerPak);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_explicit_options() {
        let args = parse(&[
            "-i",
            "dump.bin",
            "--source",
            "Native / Cart Dump",
            "--source-type",
            "fla",
            "--target",
            "pj64",
            "--target-type",
            "FlashRAM (.fla)",
            "--swap",
            "4",
            "--no-pad-trim",
            "-o",
            "/tmp/out",
            "--prefix",
            "",
            "--overwrite",
        ]);
        let config = args.gen_config().unwrap();
        assert_eq!(config.key.source_format, Format::FlashRam);
        assert_eq!(config.key.target_format, Format::FlashRam);
        assert_eq!(config.swap_choice, SwapChoice::Force4);
        assert!(!config.pad_trim);
        assert!(config.overwrite);
        assert_eq!(config.prefix, "");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_undetectable_source_type() {
        let args = parse(&["-i", "dump.bin", "--source", "native", "--target", "ra"]);
        assert!(args.gen_config().unwrap_err().contains("--source-type"));
    }

    #[test]
    fn test_list_needs_nothing_else() {
        let args = parse(&["--list"]);
        assert!(args.list());
        assert!(Args::try_parse_from(["n64-save-conv", "--source", "ra"]).is_err());
        assert!(
            Args::try_parse_from([
                "n64-save-conv",
                "-i",
                "x.sra",
                "--source",
                "gba",
                "--target",
                "ra"
            ])
            .is_err()
        );
    }
}
