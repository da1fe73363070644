use crate::DEFAULT_QUALITY;
use anyhow::{Result, bail};
use eogpkg_core::Blob;
use eogpkg_derive::context;
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::jpeg::JpegEncoder};

#[context("encoding {}x{} {:?} as JPEG (q={:?})", image.width(), image.height(), image.color(), quality)]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	let quality = quality.unwrap_or(DEFAULT_QUALITY);
	if quality >= 100 {
		bail!("JPEG does not support lossless compression, use a quality < 100");
	}

	match image {
		DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {}
		DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgba8(_) => {
			bail!("JPEG does not support an alpha channel, use png or webp")
		}
		_ => bail!("JPEG only supports 8-bit grey or RGB images"),
	}

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality.max(1)).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	log::trace!("encoded {} JPEG bytes", buffer.len());
	Ok(Blob::from(buffer))
}

#[context("decoding JPEG image ({} bytes)", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	super::decode_checked(blob, ImageFormat::Jpeg)
}
