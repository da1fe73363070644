//! The GeoPackage tables of a store.
//!
//! | table                   | content                                                    |
//! |-------------------------|------------------------------------------------------------|
//! | `gpkg_spatial_ref_sys`  | the spatial reference of the store (EPSG:4326)             |
//! | `gpkg_contents`         | one row describing the `tiles` table                       |
//! | `gpkg_geometry_columns` | declared, never populated                                  |
//! | `gpkg_tile_matrix_set`  | declared, never populated                                  |
//! | `gpkg_tile_matrix`      | declared, never populated                                  |
//! | `tiles`                 | `(zoom_level, tile_column, tile_row)` → `tile_data`        |
//!
//! The declared type of `tiles.tile_data` documents the encoding: `ARRAY` for NPY tensors,
//! `TEXT` for compressed tensors and `BLOB` for images. SQLite never converts blob values,
//! so all three hold the payload bytes unchanged.

use anyhow::{Result, bail};
use eogpkg_core::{DataKind, SpatialReference, StoreError, TileEncoding};
use eogpkg_derive::context;
use lazy_static::lazy_static;
use regex::Regex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

/// Every table of a complete store, in creation order.
pub const TABLES: [&str; 6] = [
	"gpkg_spatial_ref_sys",
	"gpkg_contents",
	"gpkg_geometry_columns",
	"gpkg_tile_matrix_set",
	"gpkg_tile_matrix",
	"tiles",
];

/// The name of the tile table, also its `gpkg_contents.table_name`.
pub const TILE_TABLE: &str = "tiles";

const DESCRIPTION: &str = "Experimental EO GPKG raster tiles by EOX IT Services";

lazy_static! {
	static ref ENCODING_LINE: Regex = Regex::new(r"(?m)^encoding:\s*(\S+)\s*$").unwrap();
}

/// Result of [`schema_is_complete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaCheck {
	Complete,
	/// The first table of [`TABLES`] that does not exist.
	Missing(&'static str),
}

impl SchemaCheck {
	/// Turns a missing table into a [`StoreError::Schema`].
	pub fn ensure_complete(self) -> Result<()> {
		match self {
			SchemaCheck::Complete => Ok(()),
			SchemaCheck::Missing(table) => bail!(StoreError::Schema {
				table: table.to_string()
			}),
		}
	}
}

/// The `gpkg_contents` row of the tile table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentsRecord {
	pub identifier: String,
	pub description: String,
	pub srs_id: i32,
	pub last_change: String,
}

impl ContentsRecord {
	/// The data kind named by the leading token of the identifier.
	pub fn data_kind(&self) -> Result<DataKind> {
		DataKind::from_identifier(&self.identifier)
	}

	/// The encoding named in the description, or the default encoding of the data kind.
	pub fn encoding(&self) -> Result<TileEncoding> {
		let kind = self.data_kind()?;
		let name = ENCODING_LINE.captures(&self.description).map(|c| c[1].to_string());
		TileEncoding::resolve(kind, name.as_deref())
	}
}

/// The declared type of `tiles.tile_data` for an encoding.
pub fn tile_data_type(encoding: TileEncoding) -> &'static str {
	match encoding {
		TileEncoding::TensorRaw => "ARRAY",
		TileEncoding::TensorCompressed(_) => "TEXT",
		TileEncoding::ImageRaster(_) => "BLOB",
	}
}

fn create_statement(table: &str, encoding: TileEncoding) -> String {
	match table {
		"gpkg_spatial_ref_sys" => String::from(
			"CREATE TABLE IF NOT EXISTS gpkg_spatial_ref_sys (
				srs_name TEXT NOT NULL,
				srs_id INTEGER NOT NULL PRIMARY KEY,
				organization TEXT NOT NULL,
				organization_coordsys_id INTEGER NOT NULL,
				definition TEXT NOT NULL,
				description TEXT
			)",
		),
		"gpkg_contents" => String::from(
			"CREATE TABLE IF NOT EXISTS gpkg_contents (
				table_name TEXT NOT NULL PRIMARY KEY,
				data_type TEXT NOT NULL,
				identifier TEXT UNIQUE,
				description TEXT DEFAULT '',
				last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
				min_x DOUBLE,
				min_y DOUBLE,
				max_x DOUBLE,
				max_y DOUBLE,
				srs_id INTEGER,
				CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
			)",
		),
		"gpkg_geometry_columns" => String::from(
			"CREATE TABLE IF NOT EXISTS gpkg_geometry_columns (
				table_name TEXT NOT NULL,
				column_name TEXT NOT NULL,
				geometry_type_name TEXT NOT NULL,
				srs_id INTEGER NOT NULL,
				z TINYINT NOT NULL,
				m TINYINT NOT NULL,
				CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name),
				CONSTRAINT uk_gc_table_name UNIQUE (table_name),
				CONSTRAINT fk_gc_tn FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
				CONSTRAINT fk_gc_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
			)",
		),
		"gpkg_tile_matrix_set" => String::from(
			"CREATE TABLE IF NOT EXISTS gpkg_tile_matrix_set (
				table_name TEXT NOT NULL PRIMARY KEY,
				srs_id INTEGER NOT NULL,
				min_x DOUBLE NOT NULL,
				min_y DOUBLE NOT NULL,
				max_x DOUBLE NOT NULL,
				max_y DOUBLE NOT NULL,
				CONSTRAINT fk_gtms_table_name FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
				CONSTRAINT fk_gtms_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
			)",
		),
		"gpkg_tile_matrix" => String::from(
			"CREATE TABLE IF NOT EXISTS gpkg_tile_matrix (
				table_name TEXT NOT NULL,
				zoom_level INTEGER NOT NULL,
				matrix_width INTEGER NOT NULL,
				matrix_height INTEGER NOT NULL,
				tile_width INTEGER NOT NULL,
				tile_height INTEGER NOT NULL,
				pixel_x_size DOUBLE NOT NULL,
				pixel_y_size DOUBLE NOT NULL,
				CONSTRAINT pk_ttm PRIMARY KEY (table_name, zoom_level),
				CONSTRAINT fk_tmm_table_name FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name)
			)",
		),
		_ => format!(
			"CREATE TABLE IF NOT EXISTS tiles (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				zoom_level INTEGER NOT NULL,
				tile_column INTEGER NOT NULL,
				tile_row INTEGER NOT NULL,
				tile_data {} NOT NULL,
				UNIQUE (zoom_level, tile_column, tile_row)
			)",
			tile_data_type(encoding)
		),
	}
}

/// Creates all missing tables and writes the spatial reference and contents rows,
/// in one transaction.
///
/// An already registered spatial reference is logged and left untouched; an existing
/// contents row is kept as it is.
#[context("creating store schema ({encoding}, EPSG:{})", srs.srs_id)]
pub fn ensure_schema(conn: &Connection, encoding: TileEncoding, srs: &SpatialReference) -> Result<()> {
	let transaction = conn.unchecked_transaction()?;

	for table in TABLES {
		let sql = create_statement(table, encoding);
		log::trace!("SQL: {sql}");
		transaction.execute_batch(&sql)?;
	}

	let result = transaction.execute(
		"INSERT INTO gpkg_spatial_ref_sys (srs_id, organization, organization_coordsys_id, srs_name, definition)
		VALUES (?1, ?2, ?3, ?4, ?5)",
		params![
			srs.srs_id,
			srs.organization,
			srs.organization_coordsys_id,
			srs.srs_name,
			srs.definition
		],
	);
	match result {
		Ok(_) => {}
		Err(rusqlite::Error::SqliteFailure(failure, _)) if failure.code == ErrorCode::ConstraintViolation => {
			log::warn!("spatial reference EPSG:{} is already registered", srs.srs_id);
		}
		Err(error) => return Err(error.into()),
	}

	let kind = encoding.data_kind();
	transaction.execute(
		"INSERT OR IGNORE INTO gpkg_contents (table_name, data_type, identifier, description, min_x, max_x, min_y, max_y, srs_id)
		VALUES (?1, 'tiles', ?2, ?3, 0, 0, 0, 0, ?4)",
		params![
			TILE_TABLE,
			kind.identifier(),
			format!("{DESCRIPTION}\nencoding: {}\n", encoding.name()),
			srs.srs_id
		],
	)?;

	transaction.commit()?;
	log::debug!("schema for {encoding} tiles in EPSG:{} is in place", srs.srs_id);
	Ok(())
}

/// Checks that every table of [`TABLES`] exists.
#[context("checking store schema")]
pub fn schema_is_complete(conn: &Connection) -> Result<SchemaCheck> {
	let mut statement = conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
	for table in TABLES {
		if !statement.exists([table])? {
			log::debug!("table '{table}' is missing");
			return Ok(SchemaCheck::Missing(table));
		}
	}
	Ok(SchemaCheck::Complete)
}

/// Reads the contents row of the tile table.
#[context("reading contents of table '{TILE_TABLE}'")]
pub fn read_contents(conn: &Connection) -> Result<ContentsRecord> {
	let record = conn
		.query_row(
			"SELECT identifier, description, srs_id, last_change FROM gpkg_contents WHERE table_name = ?1",
			[TILE_TABLE],
			|row| {
				Ok(ContentsRecord {
					identifier: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
					description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
					srs_id: row.get::<_, Option<i32>>(2)?.unwrap_or_default(),
					last_change: row.get(3)?,
				})
			},
		)
		.optional()?;

	match record {
		Some(record) => Ok(record),
		None => bail!(StoreError::FileState(format!(
			"gpkg_contents has no row for table '{TILE_TABLE}'"
		))),
	}
}
