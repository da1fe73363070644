//! The closed set of payload encodings a store can use.
//!
//! A store is created with a [`DataKind`] and an optional compression name. Both are
//! resolved exactly once into a [`TileEncoding`]:
//!
//! | data kind | compression                               | encoding                         |
//! |-----------|-------------------------------------------|----------------------------------|
//! | `tensor`  | none / `raw`                              | [`TileEncoding::TensorRaw`]      |
//! | `tensor`  | `zlib`, `gzip`, `brotli`, `zstd`, `lz4`   | [`TileEncoding::TensorCompressed`] |
//! | `image`   | none / `png`, `jpeg`, `webp`, `webp-lossless` | [`TileEncoding::ImageRaster`] |
//!
//! ```rust
//! use eogpkg_core::*;
//!
//! let encoding = TileEncoding::resolve(DataKind::Tensor, Some("lz4")).unwrap();
//! assert_eq!(encoding, TileEncoding::TensorCompressed(TensorCompression::Lz4));
//! assert_eq!(encoding.name(), "lz4");
//! assert!(TileEncoding::resolve(DataKind::Image, Some("lz4")).is_err());
//! ```

use crate::StoreError;
use anyhow::{Result, bail};
use std::fmt::Display;

/// What a store holds: numeric tensors or 8-bit image rasters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
	Tensor,
	Image,
}

impl DataKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			DataKind::Tensor => "tensor",
			DataKind::Image => "image",
		}
	}

	/// Parses a data kind. The names used by the first generation of EO GeoPackage files
	/// (`xray`, `image/TIFF`) are accepted as aliases.
	pub fn parse_str(value: &str) -> Result<DataKind> {
		Ok(match value.trim() {
			"tensor" | "xray" => DataKind::Tensor,
			"image" | "image/TIFF" => DataKind::Image,
			other => bail!(StoreError::Configuration(format!(
				"unknown data kind '{other}', expected 'tensor' or 'image'"
			))),
		})
	}

	/// The `gpkg_contents.identifier` of a store of this kind.
	pub fn identifier(&self) -> String {
		format!("{} Raster Tiles", self.as_str())
	}

	/// Recovers the data kind from the leading token of a contents identifier.
	pub fn from_identifier(identifier: &str) -> Result<DataKind> {
		let token = identifier.split_whitespace().next().unwrap_or_default();
		DataKind::parse_str(token)
	}
}

impl Display for DataKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// General-purpose byte compressors for tensor payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TensorCompression {
	Zlib,
	Gzip,
	Brotli,
	Zstd,
	Lz4,
}

impl TensorCompression {
	pub const ALL: [TensorCompression; 5] = [
		TensorCompression::Zlib,
		TensorCompression::Gzip,
		TensorCompression::Brotli,
		TensorCompression::Zstd,
		TensorCompression::Lz4,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			TensorCompression::Zlib => "zlib",
			TensorCompression::Gzip => "gzip",
			TensorCompression::Brotli => "brotli",
			TensorCompression::Zstd => "zstd",
			TensorCompression::Lz4 => "lz4",
		}
	}

	fn from_name(name: &str) -> Option<TensorCompression> {
		Some(match name {
			"zlib" => TensorCompression::Zlib,
			"gz" | "gzip" => TensorCompression::Gzip,
			"br" | "brotli" => TensorCompression::Brotli,
			"zstd" => TensorCompression::Zstd,
			"lz4" => TensorCompression::Lz4,
			_ => return None,
		})
	}
}

impl Display for TensorCompression {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Image container formats for 8-bit rasters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageCodec {
	Png,
	Jpeg,
	Webp,
	WebpLossless,
}

impl ImageCodec {
	pub const ALL: [ImageCodec; 4] = [ImageCodec::Png, ImageCodec::Jpeg, ImageCodec::Webp, ImageCodec::WebpLossless];

	pub fn as_str(&self) -> &'static str {
		match self {
			ImageCodec::Png => "png",
			ImageCodec::Jpeg => "jpeg",
			ImageCodec::Webp => "webp",
			ImageCodec::WebpLossless => "webp-lossless",
		}
	}

	pub fn is_lossless(&self) -> bool {
		matches!(self, ImageCodec::Png | ImageCodec::WebpLossless)
	}

	fn from_name(name: &str) -> Option<ImageCodec> {
		Some(match name {
			"png" => ImageCodec::Png,
			"jpg" | "jpeg" => ImageCodec::Jpeg,
			"webp" => ImageCodec::Webp,
			"webp-lossless" | "webp_lossless" => ImageCodec::WebpLossless,
			_ => return None,
		})
	}
}

impl Display for ImageCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How every tile payload of a store is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileEncoding {
	/// NPY serialisation of the tensor.
	TensorRaw,
	/// NPY serialisation followed by a byte compressor.
	TensorCompressed(TensorCompression),
	/// An 8-bit raster wrapped in an image container.
	ImageRaster(ImageCodec),
}

impl TileEncoding {
	/// Resolves the encoding of a store from its data kind and the optional compression name.
	///
	/// # Errors
	/// Returns [`StoreError::Configuration`] if the name is unknown or belongs to the other data kind.
	pub fn resolve(kind: DataKind, compression: Option<&str>) -> Result<TileEncoding> {
		let name = compression.map(|name| name.trim().to_lowercase());
		let name = match name.as_deref() {
			None | Some("" | "none" | "raw") => return Ok(TileEncoding::default_for(kind)),
			Some(name) => name,
		};

		match kind {
			DataKind::Tensor => {
				if let Some(compression) = TensorCompression::from_name(name) {
					return Ok(TileEncoding::TensorCompressed(compression));
				}
			}
			DataKind::Image => {
				if let Some(codec) = ImageCodec::from_name(name) {
					return Ok(TileEncoding::ImageRaster(codec));
				}
			}
		}

		let known = TensorCompression::from_name(name).is_some() || ImageCodec::from_name(name).is_some();
		let expected = TileEncoding::names_for(kind).join(", ");
		if known {
			bail!(StoreError::Configuration(format!(
				"compression '{name}' is not compatible with data kind '{kind}', expected one of: {expected}"
			)))
		} else {
			bail!(StoreError::Configuration(format!(
				"unknown compression '{name}', expected one of: {expected}"
			)))
		}
	}

	/// The encoding used when no compression is requested.
	pub fn default_for(kind: DataKind) -> TileEncoding {
		match kind {
			DataKind::Tensor => TileEncoding::TensorRaw,
			DataKind::Image => TileEncoding::ImageRaster(ImageCodec::Png),
		}
	}

	/// Every encoding name accepted for `kind`.
	pub fn names_for(kind: DataKind) -> Vec<&'static str> {
		match kind {
			DataKind::Tensor => std::iter::once("raw")
				.chain(TensorCompression::ALL.iter().map(|c| c.as_str()))
				.collect(),
			DataKind::Image => ImageCodec::ALL.iter().map(|c| c.as_str()).collect(),
		}
	}

	pub fn data_kind(&self) -> DataKind {
		match self {
			TileEncoding::TensorRaw | TileEncoding::TensorCompressed(_) => DataKind::Tensor,
			TileEncoding::ImageRaster(_) => DataKind::Image,
		}
	}

	/// The canonical name, as persisted in the store's contents description.
	pub fn name(&self) -> &'static str {
		match self {
			TileEncoding::TensorRaw => "raw",
			TileEncoding::TensorCompressed(compression) => compression.as_str(),
			TileEncoding::ImageRaster(codec) => codec.as_str(),
		}
	}

	/// Whether decoding reproduces the inserted tensor exactly.
	pub fn is_lossless(&self) -> bool {
		match self {
			TileEncoding::TensorRaw | TileEncoding::TensorCompressed(_) => true,
			TileEncoding::ImageRaster(codec) => codec.is_lossless(),
		}
	}
}

impl Display for TileEncoding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.data_kind(), self.name())
	}
}
