// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! n64-save-common
//!
//! Converts Nintendo 64 save files between the layouts expected by real
//! cartridges, Project64/Mupen64, Retroarch and the Wii family/Everdrive64.
//!
//! Used by:
//! - `n64-save-conv` - command line converter
//! - `n64-save-info` - reports on a save file and how it would be converted
//!
//! Typically used like this:
//!
//! ```rust ignore
//! use n64_save_common::{ConversionKey, ConversionRequest, Format, Runtime, convert};
//! let key = ConversionKey::new(
//!     Runtime::Project64,
//!     Format::Sram,
//!     Runtime::RetroArch,
//!     Format::Combined,
//! );
//! let output = convert(&ConversionRequest::new(&data, "game.sra", key));
//! std::fs::write(&output.file_name, &output.data)?;
//! ```

pub mod args;
pub mod convert;
pub mod error;
pub mod resolver;
pub mod save_types;
pub mod transform;

pub use convert::{ConversionEvent, ConversionOutput, ConversionRequest, convert, convert_at};
pub use error::{Error, Result};
pub use resolver::{
    ConversionKey, ConversionRecipe, OutputExtension, RecipeRule, resolve, valid_target_formats,
};
pub use save_types::{Format, Runtime, SwapChoice};
pub use transform::{
    DEFAULT_PREFIX, byte_swap, byte_swap_in_place, derive_output_filename,
    derive_output_filename_at, resize,
};
