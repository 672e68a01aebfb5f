// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! End to end conversion of a save image already loaded into memory.
//!
//! Reading and writing files is left to the caller.  Every log event is
//! emitted via the `log` crate as it happens, and is also returned in the
//! [`ConversionOutput`] for front ends which keep their own log view.

use chrono::{Local, NaiveDateTime};
use log::Level;

use crate::resolver::{ConversionKey, ConversionRecipe, RecipeRule, resolve};
use crate::save_types::{Format, SwapChoice};
use crate::transform::{
    DEFAULT_PREFIX, byte_swap_in_place, derive_output_filename_at, resize, source_extension,
};

/// A single conversion to perform.
#[derive(Debug, Clone)]
pub struct ConversionRequest<'a> {
    pub data: &'a [u8],
    /// Name of the source file.  Used for the output extension when the
    /// source's is kept, and as the base of the output name.
    pub file_name: &'a str,
    pub key: ConversionKey,
    pub swap_choice: SwapChoice,
    /// When false the data is passed through at its original size.
    pub pad_trim: bool,
    pub prefix: &'a str,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(data: &'a [u8], file_name: &'a str, key: ConversionKey) -> Self {
        Self {
            data,
            file_name,
            key,
            swap_choice: SwapChoice::Automatic,
            pad_trim: true,
            prefix: DEFAULT_PREFIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionEvent {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub data: Vec<u8>,
    /// Suggested name for the converted file
    pub file_name: String,
    pub recipe: ConversionRecipe,
    /// Chunk size actually swapped with.  1 if no swap was done.
    pub swap_size: usize,
    pub events: Vec<ConversionEvent>,
}

impl ConversionOutput {
    pub fn warnings(&self) -> impl Iterator<Item = &ConversionEvent> {
        self.events.iter().filter(|e| e.level == Level::Warn)
    }
}

// Records events and forwards them to the logger.
struct EventLog {
    key: ConversionKey,
    events: Vec<ConversionEvent>,
}

impl EventLog {
    fn new(key: ConversionKey) -> Self {
        Self {
            key,
            events: Vec::new(),
        }
    }

    fn push(&mut self, level: Level, message: String) {
        log::log!(level, "[{}] {}", self.key, message);
        self.events.push(ConversionEvent { level, message });
    }

    fn info(&mut self, message: String) {
        self.push(Level::Info, message);
    }

    fn warn(&mut self, message: String) {
        self.push(Level::Warn, message);
    }
}

/// Converts a save image, naming the output using the current local time.
pub fn convert(request: &ConversionRequest<'_>) -> ConversionOutput {
    convert_at(request, Local::now().naive_local())
}

/// As [`convert`] with an explicit timestamp for the output name.
pub fn convert_at(request: &ConversionRequest<'_>, timestamp: NaiveDateTime) -> ConversionOutput {
    let key = request.key;
    let mut events = EventLog::new(key);

    events.info(format!(
        "Source: {} ({}) -> Target: {} ({})",
        key.source_runtime, key.source_format, key.target_runtime, key.target_format
    ));

    let recipe = resolve(&key, request.data.len());
    match recipe.rule {
        RecipeRule::Table => events.info(format!("Using conversion table entry: {key}")),
        RecipeRule::Relocation => events.info(format!(
            "Relocating {} within the combined save (offset {})",
            if key.target_format == Format::Combined {
                key.source_format
            } else {
                key.target_format
            },
            recipe.offset
        )),
        RecipeRule::NativeIdentity => {
            events.info("Target is Native - copying data unchanged".to_string())
        }
        RecipeRule::RawCopy => {
            events.warn("No matching conversion found - defaulting to raw copy".to_string())
        }
    }

    let mut data = if request.pad_trim {
        events.info(format!(
            "Resizing data to {} bytes (offset {})",
            recipe.destination_size, recipe.offset
        ));
        resize(request.data, recipe.destination_size, recipe.offset)
    } else {
        if request.data.len() != recipe.destination_size {
            events.warn(format!(
                "Pad/trim disabled - keeping {} bytes, expected {}",
                request.data.len(),
                recipe.destination_size
            ));
        }
        request.data.to_vec()
    };

    if request.swap_choice.is_forced() && !key.source_format.is_swappable() {
        events.warn(format!(
            "Forcing a {} swap on {} data, which is not normally swapped",
            request.swap_choice, key.source_format
        ));
    }

    let swap_size = request.swap_choice.chunk_size(recipe.swap_required);
    if swap_size > 1 {
        events.info(format!("Applying {swap_size}-byte swap"));
        byte_swap_in_place(&mut data, swap_size);
    } else {
        events.info("No byte swap applied".to_string());
    }

    let source_ext = source_extension(request.file_name);
    let extension = recipe.extension.resolve(&source_ext);
    let file_name =
        derive_output_filename_at(request.file_name, extension, request.prefix, timestamp);
    events.info(format!("Output file name: {file_name}"));

    ConversionOutput {
        data,
        file_name,
        recipe,
        swap_size,
        events: events.events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save_types::{Runtime, SIZE_COMBINED, SIZE_FLASHRAM, SIZE_SRAM};
    use crate::transform::byte_swap;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 14)
            .unwrap()
            .and_hms_opt(15, 32, 45)
            .unwrap()
    }

    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len)
            .map(|ii| (ii as u8).wrapping_mul(31).wrapping_add(seed))
            .collect()
    }

    #[test]
    fn test_sram_round_trip_through_combined() {
        let sram = pattern(SIZE_SRAM, 7);

        let to_combined = ConversionRequest::new(
            &sram,
            "game.sra",
            ConversionKey::new(
                Runtime::Project64,
                Format::Sram,
                Runtime::RetroArch,
                Format::Combined,
            ),
        );
        let combined = convert_at(&to_combined, timestamp());
        assert_eq!(combined.data.len(), SIZE_COMBINED);
        assert_eq!(combined.swap_size, 2);
        assert_eq!(combined.file_name, "Converted_20251014-153245_game.srm");
        assert_eq!(
            &combined.data[133120..133120 + SIZE_SRAM],
            byte_swap(&sram, 2).as_slice()
        );

        let to_sram = ConversionRequest::new(
            &combined.data,
            &combined.file_name,
            ConversionKey::new(
                Runtime::RetroArch,
                Format::Combined,
                Runtime::Project64,
                Format::Sram,
            ),
        );
        let recovered = convert_at(&to_sram, timestamp());
        assert_eq!(recovered.recipe.offset, -133120);
        assert_eq!(recovered.data, sram);
        assert!(recovered.file_name.ends_with(".sra"));
    }

    #[test]
    fn test_flashram_into_combined() {
        let flash = pattern(SIZE_FLASHRAM, 1);
        let request = ConversionRequest::new(
            &flash,
            "paper_mario.fla",
            ConversionKey::new(
                Runtime::WiiFamily,
                Format::FlashRam,
                Runtime::RetroArch,
                Format::Combined,
            ),
        );
        let output = convert_at(&request, timestamp());

        assert_eq!(output.data.len(), 296960);
        assert!(output.data[..165888].iter().all(|&b| b == 0));
        assert_eq!(&output.data[165888..], byte_swap(&flash, 2).as_slice());
    }

    #[test]
    fn test_controller_pak_into_combined() {
        let mpk = pattern(131072, 3);
        let request = ConversionRequest::new(
            &mpk,
            "pak.mpk",
            ConversionKey::new(
                Runtime::Native,
                Format::ControllerPak,
                Runtime::RetroArch,
                Format::Combined,
            ),
        );
        let output = convert_at(&request, timestamp());

        assert_eq!(output.swap_size, 1);
        assert!(output.data[..2048].iter().all(|&b| b == 0));
        assert_eq!(&output.data[2048..2048 + 131072], mpk.as_slice());
        assert!(output.data[2048 + 131072..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unresolvable_is_raw_copy_with_warning() {
        let data = pattern(1000, 9);
        let request = ConversionRequest::new(
            &data,
            "odd.sra",
            ConversionKey::new(Runtime::Project64, Format::Sram, Runtime::Project64, Format::Sram),
        );
        let output = convert_at(&request, timestamp());

        assert_eq!(output.recipe.rule, RecipeRule::RawCopy);
        assert_eq!(output.data, data);
        assert_eq!(output.file_name, "Converted_20251014-153245_odd.sra");
        assert_eq!(output.warnings().count(), 1);
    }

    #[test]
    fn test_forced_swap_overrides_recipe() {
        let data = pattern(SIZE_SRAM, 2);
        let key = ConversionKey::new(
            Runtime::Project64,
            Format::Sram,
            Runtime::Native,
            Format::Sram,
        );
        let mut request = ConversionRequest::new(&data, "save.sra", key);
        request.swap_choice = SwapChoice::Force2;

        let output = convert_at(&request, timestamp());
        assert!(!output.recipe.swap_required);
        assert_eq!(output.swap_size, 2);
        assert_eq!(output.data, byte_swap(&data, 2));

        request.swap_choice = SwapChoice::Force4;
        let output = convert_at(&request, timestamp());
        assert_eq!(output.data, byte_swap(&data, 4));
    }

    #[test]
    fn test_forced_swap_on_eeprom_warns() {
        let data = pattern(2048, 4);
        let key = ConversionKey::new(
            Runtime::Native,
            Format::Eeprom,
            Runtime::Project64,
            Format::Eeprom,
        );
        let mut request = ConversionRequest::new(&data, "save.eep", key);
        request.swap_choice = SwapChoice::Force2;

        let output = convert_at(&request, timestamp());
        assert_eq!(output.data, byte_swap(&data, 2));
        assert_eq!(output.warnings().count(), 1);
    }

    #[test]
    fn test_pad_trim_disabled_keeps_size() {
        let data = pattern(1000, 5);
        let key = ConversionKey::new(
            Runtime::Native,
            Format::Sram,
            Runtime::RetroArch,
            Format::Combined,
        );
        let mut request = ConversionRequest::new(&data, "short.sra", key);
        request.pad_trim = false;

        let output = convert_at(&request, timestamp());
        assert_eq!(output.data.len(), 1000);
        assert_eq!(output.data, byte_swap(&data, 2));
        assert_eq!(output.warnings().count(), 1);
    }

    #[test]
    fn test_native_target_keeps_source_extension() {
        let data = pattern(SIZE_COMBINED, 6);
        let key = ConversionKey::new(
            Runtime::RetroArch,
            Format::Combined,
            Runtime::Native,
            Format::Sram,
        );
        let mut request = ConversionRequest::new(&data, "zelda.srm", key);
        request.prefix = "";

        let output = convert_at(&request, timestamp());
        assert_eq!(output.data, data);
        assert_eq!(output.file_name, "20251014-153245_zelda.srm");
    }

    #[test]
    fn test_eeprom_from_combined() {
        let mut combined = vec![0u8; SIZE_COMBINED];
        combined[..2048].copy_from_slice(&pattern(2048, 8));
        let key = ConversionKey::new(
            Runtime::RetroArch,
            Format::Combined,
            Runtime::WiiFamily,
            Format::Eeprom,
        );
        let output = convert_at(&ConversionRequest::new(&combined, "a.srm", key), timestamp());
        assert_eq!(output.data, pattern(2048, 8));
        assert_eq!(output.swap_size, 1);
    }
}
