//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] used for every encoded
//! tile payload and for the raw element buffer of a [`Tensor`](crate::Tensor).
//!
//! # Examples
//!
//! ```rust
//! use eogpkg_core::Blob;
//!
//! let blob = Blob::from(vec![0, 1, 2, 3]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.range(1..3), &[1, 2]);
//! assert_eq!(blob.into_vec(), vec![0, 1, 2, 3]);
//! ```

use std::fmt::Debug;
use std::ops::Range;

/// A simple wrapper around [`Vec<u8>`] that provides additional methods for working with byte data.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates a `Blob` of `length` zero bytes.
	///
	/// ```rust
	/// use eogpkg_core::Blob;
	///
	/// let blob = Blob::new_sized(3);
	/// assert_eq!(blob.as_slice(), &[0, 0, 0]);
	/// ```
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	/// Returns a byte slice from the specified `range`.
	///
	/// # Panics
	///
	/// Panics if the specified range is out of bounds.
	#[must_use]
	pub fn range(&self, range: Range<usize>) -> &[u8] {
		&self.0[range]
	}

	/// Returns a reference to the underlying byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the first bytes as space separated hex, for debugging output.
	///
	/// ```rust
	/// use eogpkg_core::Blob;
	///
	/// let blob = Blob::from(&[0x93, 0x4e, 0x55, 0x4d][..]);
	/// assert_eq!(blob.hex_prefix(2), "93 4e");
	/// ```
	#[must_use]
	pub fn hex_prefix(&self, count: usize) -> String {
		self
			.0
			.iter()
			.take(count)
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({} bytes: {})", self.0.len(), self.hex_prefix(8))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conversions() {
		let blob = Blob::from("abc");
		assert_eq!(blob.as_slice(), b"abc");
		assert_eq!(Blob::from(&b"abc"[..]), blob);
		assert_eq!(Blob::from(vec![97, 98, 99]), blob);
		assert!(Blob::default().is_empty());
	}

	#[test]
	fn debug() {
		let blob = Blob::from(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
		assert_eq!(format!("{blob:?}"), "Blob(10 bytes: 01 02 03 04 05 06 07 08)");
	}
}
