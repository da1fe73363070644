//! General-purpose byte compressors for tensor payloads.
//!
//! ```rust
//! use eogpkg_core::{Blob, TensorCompression, compression::*};
//!
//! let data = Blob::from(vec![7u8; 4096]);
//! let compressed = compress(&data, TensorCompression::Zstd)?;
//! assert!(compressed.len() < data.len());
//! assert_eq!(decompress(&compressed, TensorCompression::Zstd)?, data);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod methods;

pub use methods::*;

use crate::{Blob, StoreError, TensorCompression};
use anyhow::Result;

/// Compresses `blob` with the given compressor.
pub fn compress(blob: &Blob, compression: TensorCompression) -> Result<Blob> {
	match compression {
		TensorCompression::Zlib => compress_zlib(blob),
		TensorCompression::Gzip => compress_gzip(blob),
		TensorCompression::Brotli => compress_brotli(blob),
		TensorCompression::Zstd => compress_zstd(blob),
		TensorCompression::Lz4 => compress_lz4(blob),
	}
}

/// Decompresses `blob` with the given compressor.
///
/// # Errors
/// A payload that is not a valid stream of that compressor is reported as
/// [`StoreError::Encoding`].
pub fn decompress(blob: &Blob, compression: TensorCompression) -> Result<Blob> {
	let result = match compression {
		TensorCompression::Zlib => decompress_zlib(blob),
		TensorCompression::Gzip => decompress_gzip(blob),
		TensorCompression::Brotli => decompress_brotli(blob),
		TensorCompression::Zstd => decompress_zstd(blob),
		TensorCompression::Lz4 => decompress_lz4(blob),
	};
	result.map_err(|error| {
		error.context(StoreError::Encoding(format!(
			"payload is not a valid {compression} stream"
		)))
	})
}
