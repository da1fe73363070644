use crate::Blob;
use anyhow::{Context, Result};
use eogpkg_derive::context;
use flate2::bufread::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder};
use std::io::Read;

/// Compresses data into a zlib stream (RFC 1950).
#[context("compressing blob ({} bytes) using zlib", blob.len())]
pub fn compress_zlib(blob: &Blob) -> Result<Blob> {
	let mut encoder = ZlibEncoder::new(blob.as_slice(), flate2::Compression::default());
	let mut compressed_data = Vec::new();
	encoder
		.read_to_end(&mut compressed_data)
		.context("failed to compress data using zlib")?;
	Ok(Blob::from(compressed_data))
}

#[context("decompressing blob ({} bytes) using zlib", blob.len())]
pub fn decompress_zlib(blob: &Blob) -> Result<Blob> {
	let mut decoder = ZlibDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("failed to decompress data using zlib")?;
	Ok(Blob::from(decompressed_data))
}

/// Compresses data into a gzip member (RFC 1952).
#[context("compressing blob ({} bytes) using gzip", blob.len())]
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), flate2::Compression::default());
	let mut compressed_data = Vec::new();
	encoder
		.read_to_end(&mut compressed_data)
		.context("failed to compress data using gzip")?;
	Ok(Blob::from(compressed_data))
}

#[context("decompressing blob ({} bytes) using gzip", blob.len())]
pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("failed to decompress data using gzip")?;
	Ok(Blob::from(decompressed_data))
}
