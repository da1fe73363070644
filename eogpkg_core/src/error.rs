//! Classified failures of the tile store.
//!
//! Every fallible function in the eogpkg crates returns [`anyhow::Result`]. When a failure
//! belongs to one of the categories below, a [`StoreError`] is its root cause, so callers can
//! classify any error with [`StoreError::find`] regardless of how many context layers were
//! added on the way up.

use crate::TileCoord;
use thiserror::Error;

/// The error taxonomy of the tile store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
	/// Missing or unsupported mode, data kind, spatial reference or compression.
	#[error("invalid configuration: {0}")]
	Configuration(String),

	/// The file is missing or cannot be read as a store.
	#[error("invalid file state: {0}")]
	FileState(String),

	/// A required table is missing from an existing file.
	#[error("incomplete schema: table '{table}' is missing")]
	Schema { table: String },

	/// The payload does not fit the store's encoding, or a stored payload cannot be decoded.
	#[error("encoding failed: {0}")]
	Encoding(String),

	/// A tile with the same key was already inserted.
	#[error("tile {0} already exists")]
	Uniqueness(TileCoord),

	/// No tile is stored under the requested key.
	#[error("tile {0} not found")]
	NotFound(TileCoord),

	/// A write was attempted on a store opened in read mode.
	#[error("store '{0}' is opened in read mode")]
	ReadOnly(String),
}

impl StoreError {
	/// Searches `error` for a [`StoreError`], either attached as context or as a cause.
	pub fn find(error: &anyhow::Error) -> Option<&StoreError> {
		// Context layers only show up through anyhow's own downcast, not through `chain()`.
		error
			.downcast_ref::<StoreError>()
			.or_else(|| error.chain().find_map(|cause| cause.downcast_ref::<StoreError>()))
	}

	/// Short, stable name of the category, useful for logging and tests.
	pub fn kind(&self) -> &'static str {
		match self {
			StoreError::Configuration(_) => "configuration",
			StoreError::FileState(_) => "file_state",
			StoreError::Schema { .. } => "schema",
			StoreError::Encoding(_) => "encoding",
			StoreError::Uniqueness(_) => "uniqueness",
			StoreError::NotFound(_) => "not_found",
			StoreError::ReadOnly(_) => "read_only",
		}
	}
}

/// Returns the category name of the [`StoreError`] behind `error`, if any.
pub fn error_kind(error: &anyhow::Error) -> Option<&'static str> {
	StoreError::find(error).map(StoreError::kind)
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::{Context, Result, anyhow, bail};

	fn failing() -> Result<()> {
		bail!(StoreError::NotFound(TileCoord::new(3, 5, 7)?))
	}

	#[test]
	fn finds_error_through_context_layers() {
		let err = failing()
			.context("fetching tile")
			.context("reading store")
			.unwrap_err();
		assert_eq!(err.to_string(), "reading store");
		assert_eq!(
			StoreError::find(&err),
			Some(&StoreError::NotFound(TileCoord::new(3, 5, 7).unwrap()))
		);
		assert_eq!(error_kind(&err), Some("not_found"));
	}

	#[test]
	fn finds_error_attached_as_context() {
		let err = anyhow!("invalid zstd frame")
			.context(StoreError::Encoding(String::from("payload is not a valid zstd stream")))
			.context("decoding 12 byte payload as zstd");
		assert_eq!(err.root_cause().to_string(), "invalid zstd frame");
		assert_eq!(
			StoreError::find(&err),
			Some(&StoreError::Encoding(String::from("payload is not a valid zstd stream")))
		);
		assert_eq!(error_kind(&err), Some("encoding"));
	}

	#[test]
	fn outermost_error_wins() {
		let err = Err::<(), _>(anyhow!(StoreError::NotFound(TileCoord::new(1, 0, 0).unwrap())))
			.context(StoreError::Encoding(String::from("bad payload")))
			.unwrap_err();
		assert_eq!(error_kind(&err), Some("encoding"));
	}

	#[test]
	fn unclassified_errors_have_no_kind() {
		let err = anyhow!("disk on fire");
		assert!(StoreError::find(&err).is_none());
		assert_eq!(error_kind(&err), None);
	}

	#[test]
	fn messages() {
		assert_eq!(
			StoreError::Schema {
				table: "tiles".into()
			}
			.to_string(),
			"incomplete schema: table 'tiles' is missing"
		);
		assert_eq!(
			StoreError::Uniqueness(TileCoord::new(10, 3, 4).unwrap()).to_string(),
			"tile 10/3/4 already exists"
		);
	}
}
