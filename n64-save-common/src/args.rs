// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Value parsers shared by the command line tools.

use crate::save_types::{Format, Runtime, SwapChoice};

pub fn parse_format(s: &str) -> Result<Format, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

pub fn parse_runtime(s: &str) -> Result<Runtime, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

pub fn parse_swap_choice(s: &str) -> Result<SwapChoice, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Output prefixes must not move the file out of the output directory.
pub fn parse_prefix(s: &str) -> Result<String, String> {
    if s.contains(['/', '\\']) {
        return Err(format!("Invalid prefix: {}. Must not contain path separators", s));
    }
    Ok(s.to_string())
}
