use crate::Blob;
use anyhow::{Context, Result};
use brotli::{BrotliCompress, BrotliDecompress, enc::BrotliEncoderParams};
use eogpkg_derive::context;
use std::io::Cursor;

#[context("compressing blob ({} bytes) using brotli", blob.len())]
pub fn compress_brotli(blob: &Blob) -> Result<Blob> {
	let params = BrotliEncoderParams {
		quality: 9,
		lgwin: 22,
		size_hint: blob.len(),
		..Default::default()
	};
	let mut input = Cursor::new(blob.as_slice());
	let mut output = Vec::new();
	BrotliCompress(&mut input, &mut output, &params).context("failed to compress data using brotli")?;
	Ok(Blob::from(output))
}

#[context("decompressing blob ({} bytes) using brotli", blob.len())]
pub fn decompress_brotli(blob: &Blob) -> Result<Blob> {
	let mut cursor = Cursor::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	BrotliDecompress(&mut cursor, &mut decompressed_data).context("failed to decompress data using brotli")?;
	Ok(Blob::from(decompressed_data))
}
