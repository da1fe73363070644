//! NPY serialisation of tensors.
//!
//! Raw tensor tiles are stored in the NumPy `.npy` format, so a `tile_data` value can be
//! loaded directly with `numpy.load(io.BytesIO(blob))`. Layout (version 1.0):
//!
//! ```text
//! \x93NUMPY | major | minor | header_len (u16 LE) | dict literal, space padded, '\n' | elements
//! ```
//!
//! The preamble plus header is padded to a multiple of 64 bytes. Version 2.0/3.0 files use
//! a `u32` header length and are written only when the dict does not fit into `u16`.
//! Elements are written little-endian in C order; big-endian input is converted on read.

mod header;

pub use header::{ByteOrder, NpyHeader};

use crate::{Blob, StoreError, Tensor};
use anyhow::{Result, bail, ensure};
use byteorder::{ByteOrder as _, LittleEndian};
use eogpkg_derive::context;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

/// Serialises a tensor to NPY bytes.
pub fn tensor_to_npy(tensor: &Tensor) -> Result<Blob> {
	let header = NpyHeader::new(tensor.dtype(), tensor.shape());
	let mut dict = header.to_dict();

	let mut preamble_len = MAGIC.len() + 2 + 2;
	let mut major = 1u8;
	if padded_len(preamble_len, dict.len()) > usize::from(u16::MAX) {
		preamble_len = MAGIC.len() + 2 + 4;
		major = 2;
	}
	let header_len = padded_len(preamble_len, dict.len());
	dict.push_str(&" ".repeat(header_len - dict.len() - 1));
	dict.push('\n');

	let mut out = Vec::with_capacity(preamble_len + header_len + tensor.byte_len());
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&[major, 0]);
	if major == 1 {
		let mut length = [0u8; 2];
		LittleEndian::write_u16(&mut length, header_len as u16);
		out.extend_from_slice(&length);
	} else {
		let mut length = [0u8; 4];
		LittleEndian::write_u32(&mut length, header_len as u32);
		out.extend_from_slice(&length);
	}
	out.extend_from_slice(dict.as_bytes());
	out.extend_from_slice(tensor.as_bytes());

	log::trace!("serialised {tensor:?} into {} NPY bytes", out.len());
	Ok(Blob::from(out))
}

/// Length of the dict including padding and the terminating newline.
fn padded_len(preamble_len: usize, dict_len: usize) -> usize {
	let unpadded = preamble_len + dict_len + 1;
	dict_len + 1 + (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT
}

/// Parses NPY bytes back into a tensor.
///
/// # Errors
/// Returns [`StoreError::Encoding`] if the bytes are not a supported NPY payload.
#[context("parsing NPY payload ({} bytes)", bytes.len())]
pub fn npy_to_tensor(bytes: &[u8]) -> Result<Tensor> {
	ensure!(
		bytes.len() >= 10 && bytes.starts_with(MAGIC),
		StoreError::Encoding("payload is not an NPY array".into())
	);

	let (header_len, offset) = match bytes[6] {
		1 => (usize::from(LittleEndian::read_u16(&bytes[8..10])), 10),
		2 | 3 => {
			ensure!(bytes.len() >= 12, StoreError::Encoding("truncated NPY preamble".into()));
			(LittleEndian::read_u32(&bytes[8..12]) as usize, 12)
		}
		major => bail!(StoreError::Encoding(format!("unsupported NPY version {major}"))),
	};
	ensure!(
		bytes.len() >= offset + header_len,
		StoreError::Encoding("truncated NPY header".into())
	);

	let dict = String::from_utf8_lossy(&bytes[offset..offset + header_len]);
	let header = NpyHeader::parse(&dict)?;
	ensure!(
		!header.fortran_order,
		StoreError::Encoding("Fortran-ordered arrays are not supported".into())
	);

	let mut data = bytes[offset + header_len..].to_vec();
	if header.byte_order == ByteOrder::Big {
		for element in data.chunks_exact_mut(header.dtype.item_size()) {
			element.reverse();
		}
	}

	Tensor::new(header.dtype, header.shape, data)
}
