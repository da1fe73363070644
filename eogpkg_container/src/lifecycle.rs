//! Opening, creating and replacing store files.
//!
//! | mode  | overwrite | file exists | action                                             |
//! |-------|-----------|-------------|----------------------------------------------------|
//! | read  | -         | no          | `FileState` error                                  |
//! | read  | -         | yes         | open read-only, check schema, recover settings     |
//! | write | true      | -           | delete the file, then create                       |
//! | write | false     | no          | create                                             |
//! | write | false     | yes         | open, check schema, require matching settings      |

use crate::{
	OpenMode, OpenRequest, StoreOptions, TileCodec, TileStore, WriteRequest,
	schema::{ensure_schema, read_contents, schema_is_complete},
};
use anyhow::{Result, bail, ensure};
use eogpkg_core::{StoreError, TileEncoding};
use eogpkg_derive::context;
use rusqlite::{Connection, OpenFlags};
use std::{fs, path::Path};

#[context("opening store '{}' in {} mode", path.display(), options.mode)]
pub(crate) fn open(path: &Path, options: &StoreOptions) -> Result<TileStore> {
	log::debug!("open {path:?} with {options:?}");

	match options.validate()? {
		OpenRequest::Read => open_read(path),
		OpenRequest::Write(request) => {
			if request.overwrite && path.exists() {
				log::debug!("overwrite: deleting {path:?}");
				fs::remove_file(path).map_err(|e| {
					StoreError::FileState(format!("cannot delete '{}' for overwrite: {e}", path.display()))
				})?;
			}
			if path.exists() {
				open_existing(path, &request)
			} else {
				create(path, &request)
			}
		}
	}
}

fn open_read(path: &Path) -> Result<TileStore> {
	ensure!(
		path.is_file(),
		StoreError::FileState(format!("file '{}' does not exist", path.display()))
	);

	let conn = connect(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)?;
	schema_is_complete(&conn)?.ensure_complete()?;

	let contents = read_contents(&conn)?;
	let encoding = contents.encoding()?;
	log::debug!("recovered {encoding} tiles in EPSG:{} from {path:?}", contents.srs_id);

	Ok(TileStore::new(
		path,
		conn,
		OpenMode::Read,
		TileCodec::new(encoding, None),
		contents.srs_id,
	))
}

fn open_existing(path: &Path, request: &WriteRequest) -> Result<TileStore> {
	let conn = connect(path, OpenFlags::default())?;
	schema_is_complete(&conn)?.ensure_complete()?;

	let contents = read_contents(&conn)?;
	let stored = contents.encoding()?;
	ensure_matches(path, stored, contents.srs_id, request)?;
	log::debug!("appending to {stored} tiles in {path:?}");

	Ok(TileStore::new(
		path,
		conn,
		OpenMode::Write,
		TileCodec::new(stored, request.quality),
		contents.srs_id,
	))
}

fn ensure_matches(path: &Path, stored: TileEncoding, srs_id: i32, request: &WriteRequest) -> Result<()> {
	let requested = request.encoding;
	if stored.data_kind() != requested.data_kind() {
		bail!(StoreError::Configuration(format!(
			"'{}' stores {} tiles, but {} tiles were requested",
			path.display(),
			stored.data_kind(),
			requested.data_kind()
		)));
	}
	ensure!(
		stored == requested,
		StoreError::Configuration(format!(
			"'{}' is encoded as '{}', but '{}' was requested",
			path.display(),
			stored.name(),
			requested.name()
		))
	);
	ensure!(
		srs_id == request.srs.srs_id,
		StoreError::Configuration(format!(
			"'{}' uses EPSG:{srs_id}, but EPSG:{} was requested",
			path.display(),
			request.srs.srs_id
		))
	);
	Ok(())
}

/// Creates a new store file. A file that cannot be fully initialised is removed again.
#[context("creating store '{}'", path.display())]
pub(crate) fn create(path: &Path, request: &WriteRequest) -> Result<TileStore> {
	log::debug!("create {path:?} for {} tiles", request.encoding);

	let conn = connect(path, OpenFlags::default())?;
	if let Err(error) = ensure_schema(&conn, request.encoding, request.srs) {
		drop(conn);
		log::debug!("creation failed, removing {path:?}");
		if let Err(remove_error) = fs::remove_file(path) {
			log::warn!("could not remove {path:?} after failed creation: {remove_error}");
		}
		return Err(error);
	}

	Ok(TileStore::new(
		path,
		conn,
		OpenMode::Write,
		TileCodec::new(request.encoding, request.quality),
		request.srs.srs_id,
	))
}

/// Opens a connection and makes sure the file actually is an SQLite database.
fn connect(path: &Path, flags: OpenFlags) -> Result<Connection> {
	let conn = Connection::open_with_flags(path, flags).map_err(|e| {
		StoreError::FileState(format!("cannot open '{}': {e}", path.display()))
	})?;

	// SQLite reads the header lazily, so touch the schema to detect foreign files.
	conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
		.map_err(|e| StoreError::FileState(format!("'{}' is not a readable SQLite file: {e}", path.display())))?;

	log::trace!("connected to {path:?}");
	Ok(conn)
}
