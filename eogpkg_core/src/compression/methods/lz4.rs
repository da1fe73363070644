//! LZ4 block compression.
//!
//! Payloads are a single LZ4 block prefixed with the uncompressed size as a little-endian
//! `u32`, so the decoder can allocate the output up front.

use crate::Blob;
use anyhow::{Context, Result, ensure};
use byteorder::{ByteOrder, LittleEndian};
use eogpkg_derive::context;

#[context("compressing blob ({} bytes) using lz4", blob.len())]
pub fn compress_lz4(blob: &Blob) -> Result<Blob> {
	Ok(Blob::from(lz4_flex::compress_prepend_size(blob.as_slice())))
}

#[context("decompressing blob ({} bytes) using lz4", blob.len())]
pub fn decompress_lz4(blob: &Blob) -> Result<Blob> {
	ensure!(blob.len() >= 4, "lz4 payload is too short for its size prefix");
	let expected = LittleEndian::read_u32(blob.range(0..4)) as usize;

	let decompressed =
		lz4_flex::decompress_size_prepended(blob.as_slice()).context("failed to decompress data using lz4")?;
	ensure!(
		decompressed.len() == expected,
		"lz4 payload declares {expected} bytes, but decompresses to {}",
		decompressed.len()
	);
	Ok(Blob::from(decompressed))
}
