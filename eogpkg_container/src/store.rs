use crate::{OpenMode, StoreOptions, TileCodec, lifecycle, schema::read_contents};
use anyhow::{Result, bail, ensure};
use eogpkg_core::{Blob, DataKind, StoreError, Tensor, TileCoord, TileEncoding};
use eogpkg_derive::context;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params, types::ValueRef};
use std::{
	fmt::{self, Debug},
	path::{Path, PathBuf},
};

/// An open EO GeoPackage file.
///
/// A store owns a single SQLite connection. It can be moved between threads but not shared;
/// every tile operation runs in its own transaction.
pub struct TileStore {
	path: PathBuf,
	conn: Connection,
	mode: OpenMode,
	codec: TileCodec,
	srs_id: i32,
}

/// A summary of a store, as returned by [`TileStore::info`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreInfo {
	pub path: PathBuf,
	pub mode: OpenMode,
	pub data_kind: DataKind,
	pub srs_id: i32,
	pub encoding: TileEncoding,
	/// Creation timestamp of the store, e.g. `2024-03-01T12:00:00.000Z`.
	pub last_change: String,
	pub tile_count: u64,
}

impl TileStore {
	/// Opens, creates or replaces the store at `path`, as described by `options`.
	///
	/// # Errors
	/// - [`StoreError::Configuration`] for invalid options, or options that do not match an
	///   existing file in write mode. Nothing on disk is changed in that case.
	/// - [`StoreError::FileState`] if a file to be read is missing or is not an SQLite database.
	/// - [`StoreError::Schema`] if an existing file lacks one of the store tables.
	pub fn open(path: &Path, options: &StoreOptions) -> Result<TileStore> {
		lifecycle::open(path, options)
	}

	pub(crate) fn new(path: &Path, conn: Connection, mode: OpenMode, codec: TileCodec, srs_id: i32) -> TileStore {
		TileStore {
			path: path.to_path_buf(),
			conn,
			mode,
			codec,
			srs_id,
		}
	}

	/// Encodes `tensor` and stores it under `coord`.
	///
	/// # Errors
	/// - [`StoreError::ReadOnly`] if the store was opened in read mode.
	/// - [`StoreError::Encoding`] if the tensor does not fit the store's encoding.
	/// - [`StoreError::Uniqueness`] if a tile is already stored under `coord`.
	#[context("inserting tile {coord} into '{}'", self.path.display())]
	pub fn insert_tile(&self, coord: &TileCoord, tensor: &Tensor) -> Result<()> {
		ensure!(
			self.mode == OpenMode::Write,
			StoreError::ReadOnly(self.path.display().to_string())
		);

		let blob = self.codec.encode(tensor)?;
		log::trace!("insert tile {coord} ({} bytes)", blob.len());

		let transaction = self.conn.unchecked_transaction()?;
		let result = transaction.execute(
			"INSERT INTO tiles (zoom_level, tile_row, tile_column, tile_data) VALUES (?1, ?2, ?3, ?4)",
			params![coord.level, coord.row, coord.col, blob.as_slice()],
		);
		match result {
			Ok(_) => {}
			Err(rusqlite::Error::SqliteFailure(failure, _)) if failure.code == ErrorCode::ConstraintViolation => {
				bail!(StoreError::Uniqueness(*coord))
			}
			Err(error) => return Err(error.into()),
		}
		transaction.commit()?;
		Ok(())
	}

	/// Reads and decodes the tile stored under `coord`.
	///
	/// # Errors
	/// - [`StoreError::NotFound`] if no tile is stored under `coord`.
	/// - [`StoreError::Encoding`] if the stored payload cannot be decoded.
	#[context("reading tile {coord} from '{}'", self.path.display())]
	pub fn get_tile_data(&self, coord: &TileCoord) -> Result<Tensor> {
		log::trace!("get tile {coord}");

		let transaction = self.conn.unchecked_transaction()?;
		let payload = transaction
			.query_row(
				"SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_row = ?2 AND tile_column = ?3",
				params![coord.level, coord.row, coord.col],
				|row| {
					Ok(match row.get_ref(0)? {
						ValueRef::Blob(bytes) | ValueRef::Text(bytes) => Some(bytes.to_vec()),
						_ => None,
					})
				},
			)
			.optional()?;
		transaction.commit()?;

		match payload {
			None => bail!(StoreError::NotFound(*coord)),
			Some(None) => bail!(StoreError::Encoding(format!(
				"tile_data of tile {coord} is not a byte string"
			))),
			Some(Some(bytes)) => self.codec.decode(&Blob::from(bytes)),
		}
	}

	/// Whether a tile is stored under `coord`.
	#[context("looking up tile {coord} in '{}'", self.path.display())]
	pub fn contains_tile(&self, coord: &TileCoord) -> Result<bool> {
		let mut statement = self
			.conn
			.prepare_cached("SELECT 1 FROM tiles WHERE zoom_level = ?1 AND tile_row = ?2 AND tile_column = ?3")?;
		Ok(statement.exists(params![coord.level, coord.row, coord.col])?)
	}

	#[context("counting tiles in '{}'", self.path.display())]
	pub fn tile_count(&self) -> Result<u64> {
		let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// The keys of all stored tiles, ordered by level, row and column.
	#[context("listing tiles in '{}'", self.path.display())]
	pub fn tile_coords(&self) -> Result<Vec<TileCoord>> {
		let mut statement = self
			.conn
			.prepare("SELECT zoom_level, tile_row, tile_column FROM tiles ORDER BY zoom_level, tile_row, tile_column")?;
		let rows = statement.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)))?;

		let mut coords = Vec::new();
		for row in rows {
			let (level, tile_row, tile_column) = row?;
			coords.push(TileCoord::from_sql(level, tile_row, tile_column)?);
		}
		Ok(coords)
	}

	#[context("reading info of '{}'", self.path.display())]
	pub fn info(&self) -> Result<StoreInfo> {
		let contents = read_contents(&self.conn)?;
		Ok(StoreInfo {
			path: self.path.clone(),
			mode: self.mode,
			data_kind: self.data_kind(),
			srs_id: self.srs_id,
			encoding: self.encoding(),
			last_change: contents.last_change,
			tile_count: self.tile_count()?,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn mode(&self) -> OpenMode {
		self.mode
	}

	pub fn data_kind(&self) -> DataKind {
		self.codec.encoding().data_kind()
	}

	pub fn srs_id(&self) -> i32 {
		self.srs_id
	}

	pub fn encoding(&self) -> TileEncoding {
		self.codec.encoding()
	}

	pub fn codec(&self) -> &TileCodec {
		&self.codec
	}

	/// Closes the connection, reporting errors that dropping the store would swallow.
	#[context("closing '{}'", self.path.display())]
	pub fn close(self) -> Result<()> {
		log::debug!("close {:?}", self.path);
		self.conn.close().map_err(|(_, error)| error)?;
		Ok(())
	}
}

impl Debug for TileStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TileStore")
			.field("path", &self.path)
			.field("mode", &self.mode)
			.field("encoding", &self.codec.encoding())
			.field("srs_id", &self.srs_id)
			.finish()
	}
}
