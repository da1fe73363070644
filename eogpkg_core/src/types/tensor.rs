//! Multi-dimensional numeric arrays, the payload of every tile.
//!
//! A [`Tensor`] is a dtype, a row-major (C order) shape and a little-endian element buffer.
//! Its length invariant (`buffer == product(shape) * item_size`) is checked on construction,
//! so every `Tensor` in circulation is well-formed.
//!
//! ```rust
//! use eogpkg_core::{DType, Tensor};
//!
//! let tensor = Tensor::from_vec(vec![2, 3], vec![1u16, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(tensor.dtype(), DType::U16);
//! assert_eq!(tensor.shape(), &[2, 3]);
//! assert_eq!(tensor.byte_len(), 12);
//! assert_eq!(tensor.to_vec::<u16>().unwrap()[4], 5);
//! ```

use super::{Blob, DType, Element};
use crate::StoreError;
use anyhow::{Result, bail, ensure};
use std::fmt::{self, Debug};

#[derive(Clone, PartialEq, Eq)]
pub struct Tensor {
	dtype: DType,
	shape: Vec<usize>,
	data: Blob,
}

impl Tensor {
	/// Wraps an existing little-endian element buffer.
	///
	/// # Errors
	/// Returns [`StoreError::Encoding`] if the buffer length does not match the shape.
	pub fn new(dtype: DType, shape: Vec<usize>, data: impl Into<Blob>) -> Result<Tensor> {
		let data = data.into();
		let expected = byte_len_of(dtype, &shape)?;
		ensure!(
			data.len() == expected,
			StoreError::Encoding(format!(
				"{dtype} tensor of shape {shape:?} needs {expected} bytes, got {}",
				data.len()
			))
		);
		Ok(Tensor { dtype, shape, data })
	}

	/// A tensor filled with zero bytes.
	pub fn zeros(dtype: DType, shape: Vec<usize>) -> Result<Tensor> {
		let length = byte_len_of(dtype, &shape)?;
		Ok(Tensor {
			dtype,
			shape,
			data: Blob::new_sized(length),
		})
	}

	/// Builds a tensor from typed values in row-major order.
	pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Tensor> {
		let count = element_count_of(&shape)?;
		ensure!(
			values.len() == count,
			StoreError::Encoding(format!(
				"shape {shape:?} holds {count} elements, got {}",
				values.len()
			))
		);
		let mut data = Vec::with_capacity(count * T::DTYPE.item_size());
		for value in values {
			value.write_le(&mut data);
		}
		Ok(Tensor {
			dtype: T::DTYPE,
			shape,
			data: Blob::from(data),
		})
	}

	/// Reads the elements back as typed values.
	///
	/// # Errors
	/// Returns [`StoreError::Encoding`] if `T` does not match the tensor's dtype.
	pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
		if T::DTYPE != self.dtype {
			bail!(StoreError::Encoding(format!(
				"cannot read {} tensor as {}",
				self.dtype,
				T::DTYPE
			)));
		}
		Ok(self
			.data
			.as_slice()
			.chunks_exact(self.dtype.item_size())
			.map(T::read_le)
			.collect())
	}

	pub fn dtype(&self) -> DType {
		self.dtype
	}

	pub fn shape(&self) -> &[usize] {
		&self.shape
	}

	pub fn rank(&self) -> usize {
		self.shape.len()
	}

	/// Number of elements.
	pub fn element_count(&self) -> usize {
		self.shape.iter().product()
	}

	pub fn byte_len(&self) -> usize {
		self.data.len()
	}

	/// The little-endian element buffer.
	pub fn as_bytes(&self) -> &[u8] {
		self.data.as_slice()
	}
}

impl Debug for Tensor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Tensor({}, {:?})", self.dtype, self.shape)
	}
}

fn element_count_of(shape: &[usize]) -> Result<usize> {
	shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim)).ok_or_else(|| {
		StoreError::Encoding(format!("shape {shape:?} is too large")).into()
	})
}

fn byte_len_of(dtype: DType, shape: &[usize]) -> Result<usize> {
	element_count_of(shape)?
		.checked_mul(dtype.item_size())
		.ok_or_else(|| StoreError::Encoding(format!("shape {shape:?} is too large")).into())
}
