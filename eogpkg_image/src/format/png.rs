use anyhow::{Result, bail};
use eogpkg_core::Blob;
use eogpkg_derive::context;
use image::{
	DynamicImage, ImageEncoder, ImageFormat,
	codecs::png::{CompressionType, FilterType, PngEncoder},
};

#[context("encoding {}x{} {:?} as PNG", image.width(), image.height(), image.color())]
pub fn encode(image: &DynamicImage) -> Result<Blob> {
	if image.color().bytes_per_pixel() != image.color().channel_count() {
		bail!("PNG tiles must have 8 bits per channel");
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	log::trace!("encoded {} PNG bytes", buffer.len());
	Ok(Blob::from(buffer))
}

#[context("decoding PNG image ({} bytes)", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	super::decode_checked(blob, ImageFormat::Png)
}
