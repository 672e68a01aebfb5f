// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Byte level transformations applied to save images.

use chrono::{Local, NaiveDateTime};
use std::path::Path;

/// Default prefix for converted file names.
pub const DEFAULT_PREFIX: &str = "Converted_";

/// Resizes `data` to exactly `destination_size` bytes, placing the first
/// source byte at `offset` within the destination.
///
/// A negative offset means the destination is a sub-region starting
/// `-offset` bytes into the source, so that many bytes are dropped from the
/// front of the source first.
///
/// Source bytes which land outside the destination are dropped, and any
/// destination bytes not copied to are zero.
pub fn resize(data: &[u8], destination_size: usize, offset: isize) -> Vec<u8> {
    let (data, offset) = if offset < 0 {
        let trim = offset.unsigned_abs().min(data.len());
        (&data[trim..], 0)
    } else {
        (data, offset as usize)
    };

    let mut result = vec![0u8; destination_size];
    if offset < destination_size {
        let count = data.len().min(destination_size - offset);
        result[offset..offset + count].copy_from_slice(&data[..count]);
    }
    result
}

/// Reverses the byte order within each `chunk_size` chunk of `data`, in
/// place.  A short final chunk is reversed at its own length.  Chunk sizes
/// of 0 or 1 leave the data untouched.
pub fn byte_swap_in_place(data: &mut [u8], chunk_size: usize) {
    if chunk_size <= 1 {
        return;
    }
    data.chunks_mut(chunk_size).for_each(|chunk| chunk.reverse());
}

/// As [`byte_swap_in_place`], returning a new buffer.
pub fn byte_swap(data: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut swapped = data.to_vec();
    byte_swap_in_place(&mut swapped, chunk_size);
    swapped
}

/// Builds the name for a converted file:
/// `<prefix><YYYYMMDD-HHMMSS>_<original base name><extension>`.
///
/// `extension` should include the leading dot, or be empty.  Any directory
/// components of `original_name` are dropped.
pub fn derive_output_filename(original_name: &str, extension: &str, prefix: &str) -> String {
    derive_output_filename_at(original_name, extension, prefix, Local::now().naive_local())
}

/// As [`derive_output_filename`] with an explicit timestamp.
pub fn derive_output_filename_at(
    original_name: &str,
    extension: &str,
    prefix: &str,
    timestamp: NaiveDateTime,
) -> String {
    let base = Path::new(original_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{}{}_{}{}",
        prefix,
        timestamp.format("%Y%m%d-%H%M%S"),
        base,
        extension
    )
}

/// Returns the extension of `file_name` including the leading dot, or an
/// empty string if there isn't one.
pub fn source_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
