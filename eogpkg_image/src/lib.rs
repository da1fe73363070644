//! Image codecs for 8-bit raster tiles.
//!
//! An image tile is a `uint8` [`Tensor`] of shape `(h, w)` (grey), `(h, w, 2)` (grey + alpha),
//! `(h, w, 3)` (RGB) or `(h, w, 4)` (RGBA). [`encode`] wraps it into a PNG, JPEG or WebP
//! container and [`decode`] turns such a container back into a tensor of the matching shape.
//!
//! ```rust
//! use eogpkg_core::{ImageCodec, Tensor};
//!
//! let tensor = Tensor::from_vec(vec![2, 2, 3], vec![255u8; 12]).unwrap();
//! let blob = eogpkg_image::encode(&tensor, ImageCodec::Png, None).unwrap();
//! assert_eq!(eogpkg_image::decode(&blob, ImageCodec::Png).unwrap(), tensor);
//! ```

mod convert;
pub mod format;
#[cfg(test)]
mod helper;

pub use convert::*;

use anyhow::Result;
use eogpkg_core::{Blob, ImageCodec, StoreError, Tensor};

/// Quality used for lossy codecs when none is configured.
pub const DEFAULT_QUALITY: u8 = 95;

/// Encodes an image tensor with `codec`. `quality` only affects JPEG and lossy WebP.
///
/// # Errors
/// Every failure, including an unsupported dtype or shape, is reported as
/// [`StoreError::Encoding`].
pub fn encode(tensor: &Tensor, codec: ImageCodec, quality: Option<u8>) -> Result<Blob> {
	let result = tensor_to_image(tensor).and_then(|image| match codec {
		ImageCodec::Png => format::png::encode(&image),
		ImageCodec::Jpeg => format::jpeg::encode(&image, quality),
		ImageCodec::Webp => format::webp::encode(&image, quality),
		ImageCodec::WebpLossless => format::webp::encode_lossless(&image),
	});
	result.map_err(|error| error.context(StoreError::Encoding(format!("cannot encode {tensor:?} as {codec}"))))
}

/// Decodes an image container produced by [`encode`] with the same `codec`.
pub fn decode(blob: &Blob, codec: ImageCodec) -> Result<Tensor> {
	let result = match codec {
		ImageCodec::Png => format::png::decode(blob),
		ImageCodec::Jpeg => format::jpeg::decode(blob),
		ImageCodec::Webp | ImageCodec::WebpLossless => format::webp::decode(blob),
	}
	.and_then(image_to_tensor);
	result.map_err(|error| {
		error.context(StoreError::Encoding(format!(
			"cannot decode {} bytes as {codec}",
			blob.len()
		)))
	})
}
