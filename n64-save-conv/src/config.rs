// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use log::warn;
use std::path::PathBuf;

use n64_save_common::{ConversionKey, SwapChoice, valid_target_formats};

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub key: ConversionKey,
    pub swap_choice: SwapChoice,
    pub pad_trim: bool,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub overwrite: bool,
}

impl Config {
    /// Checks the input and output locations.  Unusual format combinations
    /// are only warned about - they still convert, as a raw copy if nothing
    /// better is known.
    pub fn validate(&self) -> Result<(), String> {
        if !self.input.exists() {
            return Err(format!(
                "Input file does not exist: {}",
                self.input.display()
            ));
        }
        if !self.input.is_file() {
            return Err(format!("Input is not a file: {}", self.input.display()));
        }

        if !self.output_dir.is_dir() {
            return Err(format!(
                "Output directory does not exist: {}",
                self.output_dir.display()
            ));
        }

        let valid = valid_target_formats(self.key.source_format, self.key.target_runtime);
        if !valid.contains(&self.key.target_format) {
            warn!(
                "{} is not a usual target for {} going to {} (expected one of: {})",
                self.key.target_format,
                self.key.source_format,
                self.key.target_runtime,
                valid
                    .iter()
                    .map(|f| f.short_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(())
    }
}
