// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Reading and writing save files.

use anyhow::{Context, Result, bail};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub fn load_save_file(path: &Path) -> Result<Vec<u8>> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read save file: {}", path.display()))?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// Writes `data` to `file_name` within `output_dir`, returning the full path.
/// An existing file is only replaced if `overwrite` is set.
pub fn write_save_file(
    output_dir: &Path,
    file_name: &str,
    data: &[u8],
    overwrite: bool,
) -> Result<PathBuf> {
    let path = output_dir.join(file_name);

    // create_new fails atomically if the file appeared since the name was
    // chosen
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!(
            "Output file '{}' already exists. Use --overwrite to overwrite.",
            path.display()
        ),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to create save file: {}", path.display()));
        }
    };
    file.write_all(data)
        .with_context(|| format!("Failed to write save file: {}", path.display()))?;
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(path)
}
