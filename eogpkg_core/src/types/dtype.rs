//! Element types of a [`Tensor`](crate::Tensor) and the [`Element`] trait mapping Rust
//! primitives onto them.

use anyhow::{Result, bail};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Display;

/// Numeric element type of a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
	Bool,
	U8,
	I8,
	U16,
	I16,
	U32,
	I32,
	U64,
	I64,
	F32,
	F64,
}

impl DType {
	pub const ALL: [DType; 11] = [
		DType::Bool,
		DType::U8,
		DType::I8,
		DType::U16,
		DType::I16,
		DType::U32,
		DType::I32,
		DType::U64,
		DType::I64,
		DType::F32,
		DType::F64,
	];

	/// Size of one element in bytes.
	pub fn item_size(&self) -> usize {
		match self {
			DType::Bool | DType::U8 | DType::I8 => 1,
			DType::U16 | DType::I16 => 2,
			DType::U32 | DType::I32 | DType::F32 => 4,
			DType::U64 | DType::I64 | DType::F64 => 8,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			DType::Bool => "bool",
			DType::U8 => "uint8",
			DType::I8 => "int8",
			DType::U16 => "uint16",
			DType::I16 => "int16",
			DType::U32 => "uint32",
			DType::I32 => "int32",
			DType::U64 => "uint64",
			DType::I64 => "int64",
			DType::F32 => "float32",
			DType::F64 => "float64",
		}
	}

	/// The NumPy type character (`b`, `u`, `i` or `f`).
	pub fn kind_char(&self) -> char {
		match self {
			DType::Bool => 'b',
			DType::U8 | DType::U16 | DType::U32 | DType::U64 => 'u',
			DType::I8 | DType::I16 | DType::I32 | DType::I64 => 'i',
			DType::F32 | DType::F64 => 'f',
		}
	}

	/// Inverse of ([`kind_char`](Self::kind_char), [`item_size`](Self::item_size)).
	pub fn from_kind_and_size(kind: char, size: usize) -> Option<DType> {
		DType::ALL
			.into_iter()
			.find(|dtype| dtype.kind_char() == kind && dtype.item_size() == size)
	}

	pub fn parse_str(value: &str) -> Result<DType> {
		let value = value.trim().to_lowercase();
		match DType::ALL.into_iter().find(|dtype| dtype.as_str() == value) {
			Some(dtype) => Ok(dtype),
			None => bail!("unknown dtype '{value}'"),
		}
	}
}

impl Display for DType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A Rust primitive that can be stored in a [`Tensor`](crate::Tensor).
///
/// Elements are kept little-endian inside the tensor buffer.
pub trait Element: Copy {
	const DTYPE: DType;

	fn write_le(self, out: &mut Vec<u8>);

	/// Reads one element from the start of `bytes`, which holds at least `DTYPE.item_size()` bytes.
	fn read_le(bytes: &[u8]) -> Self;
}

impl Element for bool {
	const DTYPE: DType = DType::Bool;
	fn write_le(self, out: &mut Vec<u8>) {
		out.push(u8::from(self));
	}
	fn read_le(bytes: &[u8]) -> Self {
		bytes[0] != 0
	}
}

impl Element for u8 {
	const DTYPE: DType = DType::U8;
	fn write_le(self, out: &mut Vec<u8>) {
		out.push(self);
	}
	fn read_le(bytes: &[u8]) -> Self {
		bytes[0]
	}
}

impl Element for i8 {
	const DTYPE: DType = DType::I8;
	fn write_le(self, out: &mut Vec<u8>) {
		out.push(self as u8);
	}
	fn read_le(bytes: &[u8]) -> Self {
		bytes[0] as i8
	}
}

macro_rules! impl_element {
	($type:ty, $dtype:ident, $read:ident, $write:ident) => {
		impl Element for $type {
			const DTYPE: DType = DType::$dtype;
			fn write_le(self, out: &mut Vec<u8>) {
				let mut buffer = [0u8; std::mem::size_of::<$type>()];
				LittleEndian::$write(&mut buffer, self);
				out.extend_from_slice(&buffer);
			}
			fn read_le(bytes: &[u8]) -> Self {
				LittleEndian::$read(bytes)
			}
		}
	};
}

impl_element!(u16, U16, read_u16, write_u16);
impl_element!(i16, I16, read_i16, write_i16);
impl_element!(u32, U32, read_u32, write_u32);
impl_element!(i32, I32, read_i32, write_i32);
impl_element!(u64, U64, read_u64, write_u64);
impl_element!(i64, I64, read_i64, write_i64);
impl_element!(f32, F32, read_f32, write_f32);
impl_element!(f64, F64, read_f64, write_f64);

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(DType::Bool, 'b', 1)]
	#[case(DType::U8, 'u', 1)]
	#[case(DType::I16, 'i', 2)]
	#[case(DType::U32, 'u', 4)]
	#[case(DType::F32, 'f', 4)]
	#[case(DType::I64, 'i', 8)]
	#[case(DType::F64, 'f', 8)]
	fn kind_and_size(#[case] dtype: DType, #[case] kind: char, #[case] size: usize) {
		assert_eq!(dtype.kind_char(), kind);
		assert_eq!(dtype.item_size(), size);
		assert_eq!(DType::from_kind_and_size(kind, size), Some(dtype));
	}

	#[test]
	fn unknown_kind_and_size() {
		assert_eq!(DType::from_kind_and_size('f', 2), None);
		assert_eq!(DType::from_kind_and_size('c', 16), None);
	}

	#[test]
	fn parse_str() {
		for dtype in DType::ALL {
			assert_eq!(DType::parse_str(dtype.as_str()).unwrap(), dtype);
		}
		assert_eq!(DType::parse_str(" Float32 ").unwrap(), DType::F32);
		assert_eq!(DType::parse_str("complex64").unwrap_err().to_string(), "unknown dtype 'complex64'");
	}

	#[test]
	fn element_bytes_are_little_endian() {
		let mut out = Vec::new();
		0x0102u16.write_le(&mut out);
		(-2i32).write_le(&mut out);
		true.write_le(&mut out);
		assert_eq!(out, vec![0x02, 0x01, 0xfe, 0xff, 0xff, 0xff, 0x01]);
		assert_eq!(u16::read_le(&out[0..2]), 0x0102);
		assert_eq!(i32::read_le(&out[2..6]), -2);
		assert!(bool::read_le(&out[6..]));
	}
}
