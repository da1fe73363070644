//! WebP in both flavours. Lossy encoding goes through libwebp, lossless encoding and all
//! decoding through the `image` crate. Both only accept RGB or RGBA images, since a
//! decoded WebP never has a grey layout.

use crate::DEFAULT_QUALITY;
use anyhow::{Result, anyhow, bail};
use eogpkg_core::Blob;
use eogpkg_derive::context;
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::webp::WebPEncoder};

#[context("encoding {}x{} {:?} as lossy WebP (q={:?})", image.width(), image.height(), image.color(), quality)]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	let quality = quality.unwrap_or(DEFAULT_QUALITY).min(100);

	let encoder = match image {
		DynamicImage::ImageRgb8(buffer) => webp::Encoder::from_rgb(buffer.as_raw(), image.width(), image.height()),
		DynamicImage::ImageRgba8(buffer) => webp::Encoder::from_rgba(buffer.as_raw(), image.width(), image.height()),
		_ => bail!("WebP only supports RGB or RGBA images"),
	};

	let memory = encoder
		.encode_simple(false, f32::from(quality))
		.map_err(|e| anyhow!("libwebp failed: {e:?}"))?;
	log::trace!("encoded {} lossy WebP bytes", memory.len());
	Ok(Blob::from(memory.to_vec()))
}

#[context("encoding {}x{} {:?} as lossless WebP", image.width(), image.height(), image.color())]
pub fn encode_lossless(image: &DynamicImage) -> Result<Blob> {
	if !matches!(image, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) {
		bail!("WebP only supports RGB or RGBA images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	WebPEncoder::new_lossless(&mut buffer).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	log::trace!("encoded {} lossless WebP bytes", buffer.len());
	Ok(Blob::from(buffer))
}

#[context("decoding WebP image ({} bytes)", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	super::decode_checked(blob, ImageFormat::WebP)
}
