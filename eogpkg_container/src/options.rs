//! Options for opening a [`TileStore`](crate::TileStore).
//!
//! Options can be built in code or loaded from YAML:
//!
//! ```yaml
//! mode: write
//! data_kind: tensor
//! srs_id: 4326
//! compression: zstd
//! overwrite: true
//! ```
//!
//! The values are kept as given and only validated when a store is opened, so an invalid
//! configuration is reported as [`StoreError::Configuration`] before any file is touched.

use anyhow::{Context, Result, bail, ensure};
use eogpkg_core::{DataKind, ImageCodec, SpatialReference, StoreError, TileEncoding};
use serde::Deserialize;
use std::{
	fmt::Display,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Whether a store may be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpenMode {
	Read,
	Write,
}

impl OpenMode {
	/// Parses `read`/`r` or `write`/`w`.
	pub fn parse_str(value: &str) -> Result<OpenMode> {
		Ok(match value.trim().to_lowercase().as_str() {
			"r" | "read" => OpenMode::Read,
			"w" | "write" => OpenMode::Write,
			other => bail!(StoreError::Configuration(format!(
				"unknown mode '{other}', expected 'read' or 'write'"
			))),
		})
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			OpenMode::Read => "read",
			OpenMode::Write => "write",
		}
	}
}

impl Display for OpenMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

fn default_mode() -> String {
	String::from("read")
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreOptions {
	/// `read` or `write`.
	#[serde(default = "default_mode")]
	pub mode: String,

	/// `tensor` or `image`; required in write mode.
	#[serde(default)]
	pub data_kind: Option<String>,

	/// Required in write mode; only 4326 is supported.
	#[serde(default)]
	pub srs_id: Option<i32>,

	/// A compressor for tensors or an image codec for images. Defaults to `raw` / `png`.
	#[serde(default)]
	pub compression: Option<String>,

	/// Quality of lossy image codecs, 0-99 for JPEG and 0-100 for WebP. Defaults to 95.
	#[serde(default)]
	pub quality: Option<u8>,

	/// Replace an existing file in write mode.
	#[serde(default)]
	pub overwrite: bool,
}

impl Default for StoreOptions {
	fn default() -> Self {
		StoreOptions::read()
	}
}

/// What an open call was asked to do, after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpenRequest {
	Read,
	Write(WriteRequest),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WriteRequest {
	pub encoding: TileEncoding,
	pub srs: &'static SpatialReference,
	pub quality: Option<u8>,
	pub overwrite: bool,
}

impl StoreOptions {
	/// Options for opening an existing store read-only.
	pub fn read() -> StoreOptions {
		StoreOptions {
			mode: default_mode(),
			data_kind: None,
			srs_id: None,
			compression: None,
			quality: None,
			overwrite: false,
		}
	}

	/// Options for creating or extending a store.
	pub fn write(data_kind: DataKind, srs_id: i32) -> StoreOptions {
		StoreOptions {
			mode: OpenMode::Write.to_string(),
			data_kind: Some(data_kind.to_string()),
			srs_id: Some(srs_id),
			..StoreOptions::read()
		}
	}

	pub fn with_compression(mut self, compression: &str) -> StoreOptions {
		self.compression = Some(compression.to_string());
		self
	}

	pub fn with_quality(mut self, quality: u8) -> StoreOptions {
		self.quality = Some(quality);
		self
	}

	pub fn with_overwrite(mut self, overwrite: bool) -> StoreOptions {
		self.overwrite = overwrite;
		self
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		serde_yaml_ng::from_reader(reader)
			.map_err(|e| StoreError::Configuration(format!("invalid store options: {e}")).into())
	}

	pub fn from_string(text: &str) -> Result<Self> {
		serde_yaml_ng::from_str(text).map_err(|e| StoreError::Configuration(format!("invalid store options: {e}")).into())
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening store options '{}'", path.display()))?;
		StoreOptions::from_reader(BufReader::new(file))
	}

	/// The validated mode.
	pub fn open_mode(&self) -> Result<OpenMode> {
		OpenMode::parse_str(&self.mode)
	}

	/// Checks every option and resolves the encoding. Caller-supplied data kind, srs and
	/// compression are ignored in read mode.
	pub(crate) fn validate(&self) -> Result<OpenRequest> {
		if self.open_mode()? == OpenMode::Read {
			return Ok(OpenRequest::Read);
		}

		let Some(data_kind) = self.data_kind.as_deref() else {
			bail!(StoreError::Configuration(String::from(
				"data_kind is required in write mode"
			)))
		};
		let Some(srs_id) = self.srs_id else {
			bail!(StoreError::Configuration(String::from(
				"srs_id is required in write mode"
			)))
		};

		let data_kind = DataKind::parse_str(data_kind)?;
		let srs = SpatialReference::from_id(srs_id)?;
		let encoding = TileEncoding::resolve(data_kind, self.compression.as_deref())?;

		if let Some(quality) = self.quality {
			ensure!(
				quality <= 100,
				StoreError::Configuration(format!("quality must be between 0 and 100, got {quality}"))
			);
			ensure!(
				!(encoding == TileEncoding::ImageRaster(ImageCodec::Jpeg) && quality == 100),
				StoreError::Configuration(String::from("JPEG quality must be below 100"))
			);
		}

		Ok(OpenRequest::Write(WriteRequest {
			encoding,
			srs,
			quality: self.quality,
			overwrite: self.overwrite,
		}))
	}
}
