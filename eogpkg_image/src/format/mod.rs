//! Encoders and decoders for the supported image containers.
//!
//! Every decoder first checks the container's magic bytes, so a PNG payload is never
//! silently accepted by a JPEG store.

pub mod jpeg;
pub mod png;
pub mod webp;

use anyhow::{Result, ensure};
use eogpkg_core::Blob;
use image::{DynamicImage, ImageFormat, load_from_memory_with_format};

/// Decodes `blob` after checking that it really is an image of `format`.
fn decode_checked(blob: &Blob, format: ImageFormat) -> Result<DynamicImage> {
	let detected = image::guess_format(blob.as_slice()).ok();
	ensure!(
		detected == Some(format),
		"payload is not a {format:?} image (detected: {})",
		detected.map_or_else(|| String::from("unknown"), |f| format!("{f:?}"))
	);
	Ok(load_from_memory_with_format(blob.as_slice(), format)?)
}
