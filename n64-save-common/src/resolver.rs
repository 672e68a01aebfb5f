// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Works out how to convert between a source and target runtime/format.
//!
//! Resolution always succeeds.  The rules are tried in priority order, and
//! the first to produce a recipe wins:
//! - a Native target is always an identity copy
//! - a move into or out of the combined save relocates the sub-region to
//!   or from its fixed position
//! - an exact entry in the conversion table
//! - otherwise a raw, same length copy

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::save_types::{
    CONTROLLER_PAK_COMBINED_OFFSET, FLASHRAM_COMBINED_OFFSET, Format, Runtime,
    SIZE_COMBINED, SIZE_CONTROLLER_PAK, SIZE_EEPROM, SIZE_FLASHRAM, SIZE_SRAM,
    SRAM_COMBINED_OFFSET,
};

/// Identifies a requested conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionKey {
    pub source_runtime: Runtime,
    pub source_format: Format,
    pub target_runtime: Runtime,
    pub target_format: Format,
}

impl ConversionKey {
    pub const fn new(
        source_runtime: Runtime,
        source_format: Format,
        target_runtime: Runtime,
        target_format: Format,
    ) -> Self {
        Self {
            source_runtime,
            source_format,
            target_runtime,
            target_format,
        }
    }
}

impl fmt::Display for ConversionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.source_runtime, self.source_format, self.target_runtime, self.target_format
        )
    }
}

/// The extension a converted file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputExtension {
    /// The canonical extension of this format
    Format(Format),
    /// Whatever extension the source file had
    Source,
}

impl OutputExtension {
    /// Resolves to a concrete extension, given the source file's extension.
    pub fn resolve<'a>(&self, source_extension: &'a str) -> &'a str {
        match self {
            OutputExtension::Format(format) => format.extension(),
            OutputExtension::Source => source_extension,
        }
    }
}

/// Which rule produced a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeRule {
    NativeIdentity,
    Relocation,
    Table,
    RawCopy,
}

impl fmt::Display for RecipeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeRule::NativeIdentity => write!(f, "native identity copy"),
            RecipeRule::Relocation => write!(f, "combined save relocation"),
            RecipeRule::Table => write!(f, "conversion table entry"),
            RecipeRule::RawCopy => write!(f, "raw copy"),
        }
    }
}

/// How to transform a save for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecipe {
    /// Expected size of the source.  Informational only.
    pub source_size: usize,
    pub destination_size: usize,
    /// Where the first source byte lands in the destination.  Negative to
    /// extract a sub-region from the source.
    pub offset: isize,
    /// Default only - the user can force a swap regardless.
    pub swap_required: bool,
    pub extension: OutputExtension,
    pub rule: RecipeRule,
}

impl ConversionRecipe {
    fn identity(input_len: usize, rule: RecipeRule) -> Self {
        Self {
            source_size: input_len,
            destination_size: input_len,
            offset: 0,
            swap_required: false,
            extension: OutputExtension::Source,
            rule,
        }
    }
}

struct TableEntry {
    key: ConversionKey,
    source_size: usize,
    destination_size: usize,
    offset: isize,
    swap_required: bool,
    extension: Format,
}

const fn entry(
    source_runtime: Runtime,
    source_format: Format,
    target_runtime: Runtime,
    target_format: Format,
    offset: isize,
    swap_required: bool,
) -> TableEntry {
    TableEntry {
        key: ConversionKey::new(source_runtime, source_format, target_runtime, target_format),
        source_size: size_of_format(source_format),
        destination_size: size_of_format(target_format),
        offset,
        swap_required,
        extension: target_format,
    }
}

// Format::size_bytes() isn't const
const fn size_of_format(format: Format) -> usize {
    match format {
        Format::Eeprom => SIZE_EEPROM,
        Format::Sram => SIZE_SRAM,
        Format::FlashRam => SIZE_FLASHRAM,
        Format::ControllerPak => SIZE_CONTROLLER_PAK,
        Format::Combined => SIZE_COMBINED,
    }
}

const SRA_OFFSET: isize = SRAM_COMBINED_OFFSET as isize;
const FLA_OFFSET: isize = FLASHRAM_COMBINED_OFFSET as isize;
const MPK_OFFSET: isize = CONTROLLER_PAK_COMBINED_OFFSET as isize;

use crate::save_types::Format::{
    Combined as Srm, ControllerPak as Mpk, Eeprom as Eep, FlashRam as Fla, Sram as Sra,
};
use crate::save_types::Runtime::{Native, Project64 as Pj64, RetroArch as Ra, WiiFamily as Wii};

/// Known conversions between runtimes.
static CONVERSION_TABLE: [TableEntry; 36] = [
    // Wii family
    entry(Wii, Eep, Ra, Srm, 0, false),
    entry(Wii, Eep, Native, Eep, 0, false),
    entry(Wii, Sra, Pj64, Sra, 0, true),
    entry(Wii, Sra, Ra, Srm, SRA_OFFSET, true),
    entry(Wii, Sra, Native, Sra, 0, false),
    entry(Wii, Fla, Pj64, Fla, 0, true),
    entry(Wii, Fla, Ra, Srm, FLA_OFFSET, true),
    entry(Wii, Fla, Native, Fla, 0, false),
    entry(Wii, Mpk, Ra, Srm, MPK_OFFSET, false),
    entry(Wii, Mpk, Native, Mpk, 0, false),
    // Project64/Mupen64
    entry(Pj64, Eep, Ra, Srm, 0, false),
    entry(Pj64, Eep, Native, Eep, 0, false),
    entry(Pj64, Sra, Wii, Sra, 0, true),
    entry(Pj64, Sra, Ra, Srm, SRA_OFFSET, false),
    entry(Pj64, Sra, Native, Sra, 0, false),
    entry(Pj64, Fla, Wii, Fla, 0, true),
    entry(Pj64, Fla, Ra, Srm, FLA_OFFSET, false),
    entry(Pj64, Fla, Native, Fla, 0, false),
    entry(Pj64, Mpk, Ra, Srm, MPK_OFFSET, false),
    entry(Pj64, Mpk, Native, Mpk, 0, false),
    // Retroarch
    entry(Ra, Srm, Wii, Eep, 0, false),
    entry(Ra, Srm, Wii, Sra, -SRA_OFFSET, true),
    entry(Ra, Srm, Wii, Fla, -FLA_OFFSET, true),
    entry(Ra, Srm, Wii, Mpk, -MPK_OFFSET, false),
    entry(Ra, Srm, Pj64, Eep, 0, false),
    entry(Ra, Srm, Pj64, Sra, -SRA_OFFSET, false),
    entry(Ra, Srm, Pj64, Fla, -FLA_OFFSET, false),
    entry(Ra, Srm, Pj64, Mpk, -MPK_OFFSET, false),
    // Native cartridge dumps
    entry(Native, Eep, Ra, Srm, 0, false),
    entry(Native, Sra, Ra, Srm, SRA_OFFSET, true),
    entry(Native, Fla, Ra, Srm, FLA_OFFSET, true),
    entry(Native, Mpk, Ra, Srm, MPK_OFFSET, false),
    entry(Native, Eep, Pj64, Eep, 0, false),
    entry(Native, Sra, Pj64, Sra, 0, true),
    entry(Native, Fla, Pj64, Fla, 0, true),
    entry(Native, Mpk, Pj64, Mpk, 0, false),
];

type Rule = fn(&ConversionKey, usize) -> Option<ConversionRecipe>;

/// Rules in priority order.  Raw copy is the fallback when none match.
const RULES: [Rule; 3] = [native_identity, relocation, table_lookup];

/// Resolves the recipe for a conversion.  Never fails - unknown combinations
/// become a raw copy of `input_len` bytes.
pub fn resolve(key: &ConversionKey, input_len: usize) -> ConversionRecipe {
    let recipe = RULES
        .iter()
        .find_map(|rule| rule(key, input_len))
        .unwrap_or_else(|| raw_copy(key, input_len));
    debug!("Resolved {key} ({input_len} bytes) to {recipe:?}");
    recipe
}

/// A Native target always takes the source bytes unchanged.
pub fn native_identity(key: &ConversionKey, input_len: usize) -> Option<ConversionRecipe> {
    (key.target_runtime == Runtime::Native)
        .then(|| ConversionRecipe::identity(input_len, RecipeRule::NativeIdentity))
}

/// Moving a single format into or out of the combined save.  The position of
/// the sub-region depends only on the format, not on either runtime.
pub fn relocation(key: &ConversionKey, _input_len: usize) -> Option<ConversionRecipe> {
    match (key.source_format, key.target_format) {
        (Format::Combined, Format::Combined) => None,
        (source, Format::Combined) => {
            let offset = source.combined_offset()?;
            Some(ConversionRecipe {
                source_size: source.size_bytes(),
                destination_size: SIZE_COMBINED,
                offset: offset as isize,
                swap_required: source.combined_swap(),
                extension: OutputExtension::Format(Format::Combined),
                rule: RecipeRule::Relocation,
            })
        }
        (Format::Combined, target) => {
            let offset = target.combined_offset()?;
            Some(ConversionRecipe {
                source_size: SIZE_COMBINED,
                destination_size: target.size_bytes(),
                offset: -(offset as isize),
                swap_required: target.combined_swap(),
                extension: OutputExtension::Format(target),
                rule: RecipeRule::Relocation,
            })
        }
        _ => None,
    }
}

/// Exact lookup in the conversion table.
pub fn table_lookup(key: &ConversionKey, _input_len: usize) -> Option<ConversionRecipe> {
    CONVERSION_TABLE
        .iter()
        .find(|entry| entry.key == *key)
        .map(|entry| ConversionRecipe {
            source_size: entry.source_size,
            destination_size: entry.destination_size,
            offset: entry.offset,
            swap_required: entry.swap_required,
            extension: OutputExtension::Format(entry.extension),
            rule: RecipeRule::Table,
        })
}

fn raw_copy(key: &ConversionKey, input_len: usize) -> ConversionRecipe {
    debug!("No rule matches {key}");
    ConversionRecipe::identity(input_len, RecipeRule::RawCopy)
}

/// Target formats which make sense for a source, sorted by label.
pub fn valid_target_formats(source_format: Format, target_runtime: Runtime) -> Vec<Format> {
    let mut formats = match source_format {
        Format::Combined => vec![
            Format::Eeprom,
            Format::Sram,
            Format::FlashRam,
            Format::ControllerPak,
        ],
        format => match target_runtime {
            Runtime::RetroArch => vec![Format::Combined],
            Runtime::Native | Runtime::Project64 | Runtime::WiiFamily => vec![format],
        },
    };
    formats.sort_by_key(|format| format.label());
    formats
}
