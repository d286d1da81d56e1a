//! Raw ROM image loading.
//!
//! This console boots raw ROM images: the loader reads the file and the
//! caller copies it into the bus's boot window. There is no executable
//! format to parse — the reset vector points at a fixed ROM offset.

use std::path::Path;

use crate::common::error::SimError;

/// Reads a raw ROM image from disk.
///
/// # Errors
///
/// [`SimError::Io`] when the file cannot be read.
pub fn load_rom_image(path: &Path) -> Result<Vec<u8>, SimError> {
    let image = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = image.len(), "rom image loaded");
    Ok(image)
}
