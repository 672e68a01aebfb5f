// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Errors returned when parsing selectors.  The transformations themselves
//! never fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid save format: {0}. Valid values are: eep, sra, fla, mpk, srm")]
    UnknownFormat(String),

    #[error("Invalid runtime: {0}. Valid values are: native, pj64, ra, wii")]
    UnknownRuntime(String),

    #[error("Invalid byte swap choice: {0}. Valid values are: auto, 2, 4")]
    UnknownSwapChoice(String),

    #[error("Unable to detect save format from file extension: {0}")]
    UnrecognisedExtension(String),
}

pub type Result<T> = std::result::Result<T, Error>;
