use crate::Blob;
use anyhow::Result;
use eogpkg_derive::context;
use std::io::Cursor;

/// zstd level 1-22; 3 is the library default.
const LEVEL: i32 = 3;

#[context("compressing blob ({} bytes) using zstd", blob.len())]
pub fn compress_zstd(blob: &Blob) -> Result<Blob> {
	let compressed = zstd::encode_all(Cursor::new(blob.as_slice()), LEVEL)?;
	Ok(Blob::from(compressed))
}

#[context("decompressing blob ({} bytes) using zstd", blob.len())]
pub fn decompress_zstd(blob: &Blob) -> Result<Blob> {
	let decompressed = zstd::decode_all(Cursor::new(blob.as_slice()))?;
	Ok(Blob::from(decompressed))
}
