//! The key of a tile: zoom level, row and column.
//!
//! Rows and columns are stored exactly as given; deriving them from geographic
//! coordinates is the job of the caller's tiling scheme.

use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Address of a tile inside a store.
#[derive(Eq, PartialEq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TileCoord {
	/// The zoom level of the tile. Higher values mean finer resolution.
	pub level: u8,
	/// The row index of the tile.
	pub row: u32,
	/// The column index of the tile.
	pub col: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// # Errors
	/// Returns an error if `level` > 31.
	pub fn new(level: u8, row: u32, col: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		Ok(TileCoord { level, row, col })
	}

	/// Builds a coordinate from the signed integers stored in SQLite.
	pub fn from_sql(level: i64, row: i64, col: i64) -> Result<TileCoord> {
		ensure!(
			(0..=31).contains(&level) && row >= 0 && col >= 0,
			"stored tile key ({level}, {row}, {col}) is out of range"
		);
		ensure!(
			u32::try_from(row).is_ok() && u32::try_from(col).is_ok(),
			"stored tile key ({level}, {row}, {col}) is out of range"
		);
		TileCoord::new(level as u8, row as u32, col as u32)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.row, self.col)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord(level: {}, row: {}, col: {})", self.level, self.row, self.col)
	}
}
