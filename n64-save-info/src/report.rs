// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Builds the report on a save file.  Nothing is written, the conversion is
//! only resolved.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

use n64_save_common::{
    ConversionKey, ConversionRecipe, Format, Runtime, SwapChoice, resolve, valid_target_formats,
};
use n64_save_common::transform::source_extension;

/// What the caller wants to know about, beyond the file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub source_format: Option<Format>,
    pub source_runtime: Option<Runtime>,
    pub target_runtime: Option<Runtime>,
    pub target_format: Option<Format>,
    pub swap_choice: SwapChoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    pub file: String,
    pub size: usize,
    /// None if the format could not be detected and was not given
    pub format: Option<FormatReport>,
    pub conversion: Option<ConversionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormatReport {
    pub format: Format,
    pub label: &'static str,
    pub canonical_size: usize,
    pub matches_canonical_size: bool,
    pub swappable: bool,
    pub combined_offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub key: ConversionKey,
    pub valid_target_formats: Vec<Format>,
    pub usual_target: bool,
    pub recipe: ConversionRecipe,
    pub swap_choice: SwapChoice,
    pub swap_size: usize,
}

impl FormatReport {
    fn new(format: Format, size: usize) -> Self {
        Self {
            format,
            label: format.label(),
            canonical_size: format.size_bytes(),
            matches_canonical_size: size == format.size_bytes(),
            swappable: format.is_swappable(),
            combined_offset: format.combined_offset(),
        }
    }
}

impl SaveReport {
    pub fn new(file_name: &str, data: &[u8], options: &ReportOptions) -> Self {
        let format = options
            .source_format
            .or_else(|| Format::from_path(Path::new(file_name)).ok());
        if format.is_none() {
            debug!("Could not detect the format of {file_name}");
        }

        let conversion = match (format, options.source_runtime, options.target_runtime) {
            (Some(source_format), Some(source_runtime), Some(target_runtime)) => {
                let valid = valid_target_formats(source_format, target_runtime);
                let target_format = options
                    .target_format
                    .or_else(|| valid.first().copied())
                    .unwrap_or(source_format);
                let key = ConversionKey::new(
                    source_runtime,
                    source_format,
                    target_runtime,
                    target_format,
                );
                let recipe = resolve(&key, data.len());
                Some(ConversionReport {
                    key,
                    usual_target: valid.contains(&target_format),
                    valid_target_formats: valid,
                    recipe,
                    swap_choice: options.swap_choice,
                    swap_size: options.swap_choice.chunk_size(recipe.swap_required),
                })
            }
            _ => None,
        };

        Self {
            file: file_name.to_string(),
            size: data.len(),
            format: format.map(|f| FormatReport::new(f, data.len())),
            conversion,
        }
    }
}

pub fn load_report(path: &Path, options: &ReportOptions) -> Result<SaveReport> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read save file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Invalid save file name: {}", path.display()))?;
    Ok(SaveReport::new(&file_name, &data, options))
}

pub fn print_report(report: &SaveReport) {
    println!();
    println!("Save File");
    println!("---------");
    println!("File:            {}", report.file);
    println!("Size:            {} bytes", report.size);

    println!();
    println!("Format");
    println!("------");
    match &report.format {
        Some(format) => {
            println!("Type:            {}", format.label);
            let size_note = if format.matches_canonical_size {
                "matches"
            } else {
                "does not match"
            };
            println!(
                "Canonical size:  {} bytes ({})",
                format.canonical_size, size_note
            );
            println!("Byte swappable:  {}", format.swappable);
            match format.combined_offset {
                Some(offset) => println!("Combined offset: {offset}"),
                None => println!("Combined offset: <n/a>"),
            }
        }
        None => println!("Type:            <unknown - use --source-type>"),
    }

    let Some(conversion) = &report.conversion else {
        return;
    };

    println!();
    println!("Conversion");
    println!("----------");
    let key = &conversion.key;
    println!(
        "From:            {} ({})",
        key.source_runtime, key.source_format
    );
    println!(
        "To:              {} ({})",
        key.target_runtime, key.target_format
    );
    let valid = if conversion.valid_target_formats.is_empty() {
        "<none>".to_string()
    } else {
        conversion
            .valid_target_formats
            .iter()
            .map(|f| f.short_name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Usual targets:   {valid}");
    if !conversion.usual_target {
        println!("                 ({} is not one of them)", key.target_format);
    }

    let recipe = &conversion.recipe;
    println!("Rule:            {}", recipe.rule);
    println!("Source size:     {} bytes", recipe.source_size);
    println!("Output size:     {} bytes", recipe.destination_size);
    println!("Offset:          {}", recipe.offset);
    println!(
        "Byte swap:       {} (size {})",
        conversion.swap_choice, conversion.swap_size
    );
    let source_ext = source_extension(&report.file);
    let extension = recipe.extension.resolve(&source_ext);
    if extension.is_empty() {
        println!("Extension:       <none>");
    } else {
        println!("Extension:       {extension}");
    }
}
