//! Conversion between `uint8` tensors and [`DynamicImage`]s.
//!
//! Only the four 8-bit pixel layouts are representable; every other pixel type is
//! rejected rather than converted, so a decoded tile always has the layout it was
//! written with.

use anyhow::{Result, anyhow, bail, ensure};
use eogpkg_core::{DType, Tensor};
use image::{DynamicImage, ImageBuffer};

/// Builds an image from a tensor of shape `(h, w)`, `(h, w, 2)`, `(h, w, 3)` or `(h, w, 4)`.
pub fn tensor_to_image(tensor: &Tensor) -> Result<DynamicImage> {
	ensure!(
		tensor.dtype() == DType::U8,
		"image tiles must be uint8 tensors, got {}",
		tensor.dtype()
	);

	let (height, width, channels) = match tensor.shape() {
		&[height, width] => (height, width, 1),
		&[height, width, channels @ 2..=4] => (height, width, channels),
		shape => bail!("image tiles must have shape (h, w) or (h, w, 2..=4), got {shape:?}"),
	};
	ensure!(
		height > 0 && width > 0,
		"image tiles must not be empty, got {:?}",
		tensor.shape()
	);

	let width = u32::try_from(width)?;
	let height = u32::try_from(height)?;
	let data = tensor.as_bytes().to_vec();
	let error = || anyhow!("failed to create a {width}x{height} image with {channels} channels");

	Ok(match channels {
		1 => DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, data).ok_or_else(error)?),
		2 => DynamicImage::ImageLumaA8(ImageBuffer::from_raw(width, height, data).ok_or_else(error)?),
		3 => DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, data).ok_or_else(error)?),
		_ => DynamicImage::ImageRgba8(ImageBuffer::from_raw(width, height, data).ok_or_else(error)?),
	})
}

/// Turns an 8-bit image back into a tensor; grey images become 2-D tensors.
pub fn image_to_tensor(image: DynamicImage) -> Result<Tensor> {
	let height = image.height() as usize;
	let width = image.width() as usize;
	let (shape, data) = match image {
		DynamicImage::ImageLuma8(buffer) => (vec![height, width], buffer.into_raw()),
		DynamicImage::ImageLumaA8(buffer) => (vec![height, width, 2], buffer.into_raw()),
		DynamicImage::ImageRgb8(buffer) => (vec![height, width, 3], buffer.into_raw()),
		DynamicImage::ImageRgba8(buffer) => (vec![height, width, 4], buffer.into_raw()),
		other => bail!("pixel type {:?} cannot be stored as a uint8 tensor", other.color()),
	};
	Tensor::new(DType::U8, shape, data)
}
