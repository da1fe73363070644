use crate::{DType, StoreError};
use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref DESCR: Regex = Regex::new(r"'descr'\s*:\s*'([<>|=])([a-zA-Z])(\d+)'").unwrap();
	static ref FORTRAN_ORDER: Regex = Regex::new(r"'fortran_order'\s*:\s*(True|False)").unwrap();
	static ref SHAPE: Regex = Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").unwrap();
}

/// Byte order of the elements described by a header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
	Little,
	Big,
	/// Single byte types (`|`); byte order does not apply.
	NotApplicable,
}

/// The content of the Python dict literal at the start of an NPY file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpyHeader {
	pub dtype: DType,
	pub byte_order: ByteOrder,
	pub fortran_order: bool,
	pub shape: Vec<usize>,
}

impl NpyHeader {
	/// Header for a little-endian, C-ordered tensor.
	pub fn new(dtype: DType, shape: &[usize]) -> NpyHeader {
		let byte_order = if dtype.item_size() == 1 {
			ByteOrder::NotApplicable
		} else {
			ByteOrder::Little
		};
		NpyHeader {
			dtype,
			byte_order,
			fortran_order: false,
			shape: shape.to_vec(),
		}
	}

	/// The dict literal, e.g. `{'descr': '<f4', 'fortran_order': False, 'shape': (255, 255), }`.
	pub fn to_dict(&self) -> String {
		let order = match self.byte_order {
			ByteOrder::Little => '<',
			ByteOrder::Big => '>',
			ByteOrder::NotApplicable => '|',
		};
		let shape = match self.shape.as_slice() {
			[] => String::from("()"),
			[single] => format!("({single},)"),
			dims => format!(
				"({})",
				dims.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
			),
		};
		format!(
			"{{'descr': '{order}{}{}', 'fortran_order': {}, 'shape': {shape}, }}",
			self.dtype.kind_char(),
			self.dtype.item_size(),
			if self.fortran_order { "True" } else { "False" },
		)
	}

	pub fn parse(dict: &str) -> Result<NpyHeader> {
		let descr = DESCR
			.captures(dict)
			.ok_or_else(|| encoding_error(format!("NPY header has no valid 'descr': {dict}")))?;
		let byte_order = match &descr[1] {
			// '=' means native order; stores are only ever written little-endian.
			"<" | "=" => ByteOrder::Little,
			">" => ByteOrder::Big,
			_ => ByteOrder::NotApplicable,
		};
		let kind = descr[2].chars().next().unwrap_or_default();
		let size: usize = descr[3]
			.parse()
			.map_err(|_| encoding_error(format!("invalid item size in '{}'", &descr[0])))?;
		let dtype = DType::from_kind_and_size(kind, size)
			.ok_or_else(|| encoding_error(format!("unsupported NPY dtype '{kind}{size}'")))?;

		let fortran_order = FORTRAN_ORDER
			.captures(dict)
			.ok_or_else(|| encoding_error(format!("NPY header has no valid 'fortran_order': {dict}")))?;
		let fortran_order = &fortran_order[1] == "True";

		let shape = SHAPE
			.captures(dict)
			.ok_or_else(|| encoding_error(format!("NPY header has no valid 'shape': {dict}")))?;
		let shape = parse_shape(&shape[1])?;

		Ok(NpyHeader {
			dtype,
			byte_order,
			fortran_order,
			shape,
		})
	}
}

fn parse_shape(tuple: &str) -> Result<Vec<usize>> {
	tuple
		.split(',')
		.map(str::trim)
		.filter(|dim| !dim.is_empty())
		.map(|dim| {
			// Python 2 wrote long integers with an `L` suffix.
			dim.trim_end_matches('L')
				.parse::<usize>()
				.map_err(|_| encoding_error(format!("invalid dimension '{dim}' in NPY shape")))
		})
		.collect()
}

fn encoding_error(message: String) -> anyhow::Error {
	anyhow!(StoreError::Encoding(message))
}
