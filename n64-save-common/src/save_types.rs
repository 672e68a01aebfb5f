// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Save formats, runtimes and their fixed sizes, extensions and offsets
//! within the combined (Retroarch) save layout.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum::EnumIter;

use crate::error::Error;

pub const SIZE_EEPROM: usize = 2048;
pub const SIZE_SRAM: usize = 32768;
pub const SIZE_FLASHRAM: usize = 131072;
pub const SIZE_CONTROLLER_PAK: usize = 131072;
pub const SIZE_COMBINED: usize = 296960;

pub const EXT_EEPROM: &str = ".eep";
pub const EXT_SRAM: &str = ".sra";
pub const EXT_FLASHRAM: &str = ".fla";
pub const EXT_CONTROLLER_PAK: &str = ".mpk";
pub const EXT_COMBINED: &str = ".srm";

// Positions of each sub-region within the combined save.  These are fixed
// by the emulators that read the combined layout.
pub const EEPROM_COMBINED_OFFSET: usize = 0;
pub const CONTROLLER_PAK_COMBINED_OFFSET: usize = 2048;
pub const SRAM_COMBINED_OFFSET: usize = 133120;
pub const FLASHRAM_COMBINED_OFFSET: usize = SIZE_COMBINED - SIZE_FLASHRAM;

// FlashRAM is the last sub-region, and the Controller Pak region must end
// where SRAM begins.
const_assert_eq!(FLASHRAM_COMBINED_OFFSET, 165888);
const_assert_eq!(
    CONTROLLER_PAK_COMBINED_OFFSET + SIZE_CONTROLLER_PAK,
    SRAM_COMBINED_OFFSET
);

/// A save data byte layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Eeprom,
    Sram,
    FlashRam,
    ControllerPak,
    /// Retroarch's single file holding all of the others
    Combined,
}

impl Format {
    /// Accepts the display label, the short name or the extension (with or
    /// without the leading dot).
    pub fn try_from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "eep" | ".eep" | "eeprom" | "eeprom (.eep)" => Some(Format::Eeprom),
            "sra" | ".sra" | "sram" | "sram (.sra)" => Some(Format::Sram),
            "fla" | ".fla" | "flashram" | "flashram (.fla)" => Some(Format::FlashRam),
            "mpk" | ".mpk" | "controller-pak" | "controller pak" | "controller pak (.mpk)" => {
                Some(Format::ControllerPak)
            }
            "srm" | ".srm" | "combined" | "retroarch save" | "retroarch save (.srm)" => {
                Some(Format::Combined)
            }
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Format::iter().find(|format| format.extension()[1..] == ext)
    }

    /// Detects the format from a file's extension.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
            .ok_or_else(|| Error::UnrecognisedExtension(path.display().to_string()))
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            Format::Eeprom => SIZE_EEPROM,
            Format::Sram => SIZE_SRAM,
            Format::FlashRam => SIZE_FLASHRAM,
            Format::ControllerPak => SIZE_CONTROLLER_PAK,
            Format::Combined => SIZE_COMBINED,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Eeprom => EXT_EEPROM,
            Format::Sram => EXT_SRAM,
            Format::FlashRam => EXT_FLASHRAM,
            Format::ControllerPak => EXT_CONTROLLER_PAK,
            Format::Combined => EXT_COMBINED,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Eeprom => "EEPROM (.eep)",
            Format::Sram => "SRAM (.sra)",
            Format::FlashRam => "FlashRAM (.fla)",
            Format::ControllerPak => "Controller Pak (.mpk)",
            Format::Combined => "Retroarch Save (.srm)",
        }
    }

    pub fn short_name(&self) -> &'static str {
        &self.extension()[1..]
    }

    /// Whether byte order matters for this format.  EEPROM data is read a
    /// byte at a time by every runtime, so swapping it only corrupts it.
    pub fn is_swappable(&self) -> bool {
        !matches!(self, Format::Eeprom)
    }

    /// Where this format's data sits inside the combined save, or `None` for
    /// the combined format itself.
    pub fn combined_offset(&self) -> Option<usize> {
        match self {
            Format::Eeprom => Some(EEPROM_COMBINED_OFFSET),
            Format::Sram => Some(SRAM_COMBINED_OFFSET),
            Format::FlashRam => Some(FLASHRAM_COMBINED_OFFSET),
            Format::ControllerPak => Some(CONTROLLER_PAK_COMBINED_OFFSET),
            Format::Combined => None,
        }
    }

    /// Whether this format's sub-region is stored 16-bit byte swapped inside
    /// the combined save.
    pub fn combined_swap(&self) -> bool {
        matches!(self, Format::Sram | Format::FlashRam)
    }

    pub fn iter() -> impl Iterator<Item = Format> {
        <Format as strum::IntoEnumIterator>::iter()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::try_from_str(s).ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

/// The hardware or emulator a save is read from or destined for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum Runtime {
    /// Raw cartridge dump
    Native,
    /// Project64 and Mupen64
    Project64,
    RetroArch,
    /// Wii, WiiU virtual console and Everdrive64
    WiiFamily,
}

impl Runtime {
    pub fn try_from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "native" | "cart" | "native / cart dump" => Some(Runtime::Native),
            "pj64" | "project64" | "mupen64" | "project64/mupen64" => Some(Runtime::Project64),
            "ra" | "retroarch" => Some(Runtime::RetroArch),
            "wii" | "wiiu" | "everdrive" | "everdrive64" | "wii/wiiu/everdrive64" => {
                Some(Runtime::WiiFamily)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Runtime::Native => "Native / Cart Dump",
            Runtime::Project64 => "Project64/Mupen64",
            Runtime::RetroArch => "Retroarch",
            Runtime::WiiFamily => "Wii/WiiU/Everdrive64",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Runtime::Native => "native",
            Runtime::Project64 => "pj64",
            Runtime::RetroArch => "ra",
            Runtime::WiiFamily => "wii",
        }
    }

    pub fn iter() -> impl Iterator<Item = Runtime> {
        <Runtime as strum::IntoEnumIterator>::iter()
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Runtime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Runtime::try_from_str(s).ok_or_else(|| Error::UnknownRuntime(s.to_string()))
    }
}

/// The user's byte swap selection.  Anything other than `Automatic` wins over
/// whatever the conversion recipe asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapChoice {
    #[default]
    Automatic,
    Force2,
    Force4,
}

impl SwapChoice {
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "automatic" | "default" | "none" => Some(SwapChoice::Automatic),
            "2" | "2 bytes" | "force-2" => Some(SwapChoice::Force2),
            "4" | "4 bytes" | "force-4" => Some(SwapChoice::Force4),
            _ => None,
        }
    }

    /// Chunk size to swap with.  1 means no swap.
    pub fn chunk_size(&self, swap_required: bool) -> usize {
        match self {
            SwapChoice::Force2 => 2,
            SwapChoice::Force4 => 4,
            SwapChoice::Automatic if swap_required => 2,
            SwapChoice::Automatic => 1,
        }
    }

    pub fn is_forced(&self) -> bool {
        !matches!(self, SwapChoice::Automatic)
    }
}

impl fmt::Display for SwapChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapChoice::Automatic => write!(f, "Automatic"),
            SwapChoice::Force2 => write!(f, "2 bytes"),
            SwapChoice::Force4 => write!(f, "4 bytes"),
        }
    }
}

impl FromStr for SwapChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SwapChoice::try_from_str(s).ok_or_else(|| Error::UnknownSwapChoice(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sizes() {
        assert_eq!(Format::Eeprom.size_bytes(), 2048);
        assert_eq!(Format::Sram.size_bytes(), 32768);
        assert_eq!(Format::FlashRam.size_bytes(), 131072);
        assert_eq!(Format::ControllerPak.size_bytes(), 131072);
        assert_eq!(Format::Combined.size_bytes(), 296960);
    }

    #[test]
    fn test_combined_offsets() {
        assert_eq!(Format::Eeprom.combined_offset(), Some(0));
        assert_eq!(Format::ControllerPak.combined_offset(), Some(2048));
        assert_eq!(Format::Sram.combined_offset(), Some(133120));
        assert_eq!(Format::FlashRam.combined_offset(), Some(165888));
        assert_eq!(Format::Combined.combined_offset(), None);

        // Every sub-region fits inside the combined save
        for format in Format::iter().filter(|f| *f != Format::Combined) {
            let end = format.combined_offset().unwrap() + format.size_bytes();
            assert!(end <= SIZE_COMBINED, "{format} overruns the combined save");
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(Format::try_from_str("SRAM (.sra)"), Some(Format::Sram));
        assert_eq!(Format::try_from_str("sra"), Some(Format::Sram));
        assert_eq!(Format::try_from_str(".FLA"), Some(Format::FlashRam));
        assert_eq!(
            Format::try_from_str("Controller Pak (.mpk)"),
            Some(Format::ControllerPak)
        );
        assert_eq!(
            "Retroarch Save (.srm)".parse::<Format>(),
            Ok(Format::Combined)
        );
        assert_eq!(
            "bin".parse::<Format>(),
            Err(Error::UnknownFormat("bin".to_string()))
        );

        // Labels round trip
        for format in Format::iter() {
            assert_eq!(format.label().parse::<Format>(), Ok(format));
            assert_eq!(format.short_name().parse::<Format>(), Ok(format));
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("/saves/Mario Kart 64.EEP")),
            Ok(Format::Eeprom)
        );
        assert_eq!(
            Format::from_path(Path::new("zelda.srm")),
            Ok(Format::Combined)
        );
        assert!(matches!(
            Format::from_path(Path::new("notes.txt")),
            Err(Error::UnrecognisedExtension(_))
        ));
        assert!(Format::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_runtime_parsing() {
        for runtime in Runtime::iter() {
            assert_eq!(runtime.label().parse::<Runtime>(), Ok(runtime));
            assert_eq!(runtime.short_name().parse::<Runtime>(), Ok(runtime));
        }
        assert_eq!(Runtime::try_from_str("RetroArch"), Some(Runtime::RetroArch));
        assert!("snes9x".parse::<Runtime>().is_err());
    }

    #[test]
    fn test_swappable() {
        assert!(!Format::Eeprom.is_swappable());
        assert!(Format::Sram.is_swappable());
        assert!(Format::FlashRam.is_swappable());
        assert!(Format::ControllerPak.is_swappable());
        assert!(Format::Combined.is_swappable());
    }

    #[test]
    fn test_swap_choice_chunk_size() {
        assert_eq!(SwapChoice::Automatic.chunk_size(false), 1);
        assert_eq!(SwapChoice::Automatic.chunk_size(true), 2);
        assert_eq!(SwapChoice::Force2.chunk_size(false), 2);
        assert_eq!(SwapChoice::Force4.chunk_size(true), 4);
        assert_eq!(SwapChoice::try_from_str("4 bytes"), Some(SwapChoice::Force4));
        assert_eq!(SwapChoice::try_from_str("Default"), Some(SwapChoice::Automatic));
        assert!("3".parse::<SwapChoice>().is_err());
    }
}
