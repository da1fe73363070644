//! Integration tests for opening, creating and replacing store files.

use anyhow::Result;
use assert_fs::{TempDir, prelude::*};
use eogpkg_container::{schema::*, *};
use eogpkg_core::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::{path::Path, thread::sleep, time::Duration};

fn create_store(path: &Path, options: &StoreOptions) -> Result<()> {
	let store = TileStore::open(path, options)?;
	store.insert_tile(&TileCoord::new(0, 0, 0)?, &Tensor::zeros(DType::U8, vec![4, 4])?)?;
	store.close()
}

fn last_change(path: &Path) -> Result<String> {
	Ok(TileStore::open(path, &StoreOptions::read())?.info()?.last_change)
}

#[rstest]
#[case::tensor_raw(DataKind::Tensor, None, TileEncoding::TensorRaw)]
#[case::tensor_brotli(DataKind::Tensor, Some("brotli"), TileEncoding::TensorCompressed(TensorCompression::Brotli))]
#[case::image_png(DataKind::Image, None, TileEncoding::ImageRaster(ImageCodec::Png))]
#[case::image_webp(DataKind::Image, Some("webp"), TileEncoding::ImageRaster(ImageCodec::Webp))]
fn read_mode_recovers_settings(
	#[case] kind: DataKind,
	#[case] compression: Option<&str>,
	#[case] encoding: TileEncoding,
) -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	let mut options = StoreOptions::write(kind, 4326);
	if let Some(compression) = compression {
		options = options.with_compression(compression);
	}
	TileStore::open(path.path(), &options)?.close()?;

	// Caller supplied values are ignored in read mode.
	let read = StoreOptions {
		data_kind: Some(String::from("image")),
		compression: Some(String::from("jpeg")),
		..StoreOptions::read()
	};
	let store = TileStore::open(path.path(), &read)?;
	assert_eq!(store.mode(), OpenMode::Read);
	assert_eq!(store.data_kind(), kind);
	assert_eq!(store.srs_id(), 4326);
	assert_eq!(store.encoding(), encoding);
	Ok(())
}

#[test]
fn overwrite_resets_last_change() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	let options = StoreOptions::write(DataKind::Tensor, 4326);

	create_store(path.path(), &options)?;
	let first = last_change(path.path())?;

	sleep(Duration::from_millis(20));
	TileStore::open(path.path(), &options)?.close()?;
	assert_eq!(last_change(path.path())?, first);

	sleep(Duration::from_millis(20));
	let store = TileStore::open(path.path(), &options.clone().with_overwrite(true))?;
	assert_eq!(store.tile_count()?, 0);
	store.close()?;
	assert!(last_change(path.path())? > first);
	Ok(())
}

#[test]
fn reopening_for_write_keeps_tiles() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	let options = StoreOptions::write(DataKind::Tensor, 4326).with_compression("gzip");
	create_store(path.path(), &options)?;

	let store = TileStore::open(path.path(), &options)?;
	assert_eq!(store.tile_count()?, 1);
	store.insert_tile(&TileCoord::new(1, 0, 0)?, &Tensor::zeros(DType::U8, vec![4, 4])?)?;
	assert_eq!(store.tile_count()?, 2);
	Ok(())
}

#[rstest]
#[case::kind(StoreOptions::write(DataKind::Image, 4326), "'{}' stores tensor tiles, but image tiles were requested")]
#[case::encoding(StoreOptions::write(DataKind::Tensor, 4326).with_compression("zstd"), "'{}' is encoded as 'raw', but 'zstd' was requested")]
fn reopening_with_different_settings_fails(#[case] options: StoreOptions, #[case] message: &str) -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	create_store(path.path(), &StoreOptions::write(DataKind::Tensor, 4326))?;

	let err = TileStore::open(path.path(), &options).unwrap_err();
	assert_eq!(
		StoreError::find(&err),
		Some(&StoreError::Configuration(message.replace("{}", &path.path().display().to_string())))
	);

	// The file is left as it was.
	assert_eq!(TileStore::open(path.path(), &StoreOptions::read())?.tile_count()?, 1);
	Ok(())
}

#[rstest]
#[case::mode(StoreOptions { mode: String::from("append"), ..StoreOptions::write(DataKind::Tensor, 4326) })]
#[case::kind(StoreOptions { data_kind: Some(String::from("vector")), ..StoreOptions::write(DataKind::Tensor, 4326) })]
#[case::missing_kind(StoreOptions { data_kind: None, ..StoreOptions::write(DataKind::Tensor, 4326) })]
#[case::srs(StoreOptions::write(DataKind::Tensor, 3857))]
#[case::missing_srs(StoreOptions { srs_id: None, ..StoreOptions::write(DataKind::Tensor, 4326) })]
#[case::compression(StoreOptions::write(DataKind::Tensor, 4326).with_compression("png"))]
#[case::unknown_compression(StoreOptions::write(DataKind::Image, 4326).with_compression("blosclz"))]
fn invalid_options_leave_no_file(#[case] options: StoreOptions) -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");

	let err = TileStore::open(path.path(), &options).unwrap_err();
	assert_eq!(error_kind(&err), Some("configuration"));
	assert!(!path.path().exists());

	let err = TileStore::open(path.path(), &options.with_overwrite(true)).unwrap_err();
	assert_eq!(error_kind(&err), Some("configuration"));
	assert!(!path.path().exists());
	Ok(())
}

#[test]
fn invalid_options_do_not_delete_existing_files() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	create_store(path.path(), &StoreOptions::write(DataKind::Tensor, 4326))?;

	let options = StoreOptions::write(DataKind::Tensor, 3857).with_overwrite(true);
	assert_eq!(error_kind(&TileStore::open(path.path(), &options).unwrap_err()), Some("configuration"));
	assert_eq!(TileStore::open(path.path(), &StoreOptions::read())?.tile_count()?, 1);
	Ok(())
}

#[test]
fn overwrite_that_cannot_delete_is_a_file_state_error() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	path.create_dir_all()?;

	let options = StoreOptions::write(DataKind::Tensor, 4326).with_overwrite(true);
	let err = TileStore::open(path.path(), &options).unwrap_err();
	assert_eq!(error_kind(&err), Some("file_state"));
	assert!(path.path().is_dir());
	Ok(())
}

#[test]
fn read_mode_requires_an_existing_file() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("missing.gpkg");
	let err = TileStore::open(path.path(), &StoreOptions::read()).unwrap_err();
	assert_eq!(error_kind(&err), Some("file_state"));
	assert!(!path.path().exists());
	Ok(())
}

#[test]
fn read_mode_rejects_foreign_files() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("notes.gpkg");
	path.write_str(&"not an SQLite database ".repeat(64))?;

	let err = TileStore::open(path.path(), &StoreOptions::read()).unwrap_err();
	assert_eq!(error_kind(&err), Some("file_state"));

	let err = TileStore::open(path.path(), &StoreOptions::write(DataKind::Tensor, 4326)).unwrap_err();
	assert_eq!(error_kind(&err), Some("file_state"));
	Ok(())
}

#[rstest]
fn incomplete_schema_is_reported(
	#[values(
		"gpkg_spatial_ref_sys",
		"gpkg_contents",
		"gpkg_geometry_columns",
		"gpkg_tile_matrix_set",
		"gpkg_tile_matrix",
		"tiles"
	)]
	table: &str,
	#[values(true, false)] read: bool,
) -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("broken.gpkg");
	create_store(path.path(), &StoreOptions::write(DataKind::Tensor, 4326))?;
	rusqlite::Connection::open(path.path())?
		.execute_batch(&format!("PRAGMA foreign_keys = OFF; DROP TABLE {table}"))?;

	let options = if read {
		StoreOptions::read()
	} else {
		StoreOptions::write(DataKind::Tensor, 4326)
	};
	let err = TileStore::open(path.path(), &options).unwrap_err();
	assert_eq!(
		StoreError::find(&err),
		Some(&StoreError::Schema {
			table: table.to_string()
		})
	);

	// No repair happens.
	let conn = rusqlite::Connection::open(path.path())?;
	assert!(matches!(schema_is_complete(&conn)?, SchemaCheck::Missing(missing) if missing == table));
	Ok(())
}

#[test]
fn legacy_identifiers_can_be_read() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("legacy.gpkg");
	create_store(path.path(), &StoreOptions::write(DataKind::Tensor, 4326))?;

	let conn = rusqlite::Connection::open(path.path())?;
	conn.execute_batch(
		"UPDATE gpkg_contents SET identifier = 'xray Raster Tiles',
		description = '\nExperimental EO GPKG raster tiles by EOX IT Services (ju@eox.at)\n'",
	)?;
	drop(conn);

	let store = TileStore::open(path.path(), &StoreOptions::read())?;
	assert_eq!(store.data_kind(), DataKind::Tensor);
	assert_eq!(store.encoding(), TileEncoding::TensorRaw);
	assert_eq!(store.get_tile_data(&TileCoord::new(0, 0, 0)?)?, Tensor::zeros(DType::U8, vec![4, 4])?);
	Ok(())
}

#[test]
fn options_from_yaml_file() -> Result<()> {
	let dir = TempDir::new()?;
	let config = dir.child("store.yml");
	config.write_str("mode: write\ndata_kind: image\nsrs_id: 4326\ncompression: webp-lossless\n")?;

	let options = StoreOptions::from_path(config.path())?;
	let store = TileStore::open(dir.child("image.gpkg").path(), &options)?;
	assert_eq!(store.encoding(), TileEncoding::ImageRaster(ImageCodec::WebpLossless));
	Ok(())
}

#[test]
fn read_mode_opens_read_only() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.child("store.gpkg");
	create_store(path.path(), &StoreOptions::write(DataKind::Tensor, 4326))?;

	let store = TileStore::open(path.path(), &StoreOptions::read())?;
	let err = store.insert_tile(&TileCoord::new(9, 9, 9)?, &Tensor::zeros(DType::U8, vec![1])?).unwrap_err();
	assert_eq!(error_kind(&err), Some("read_only"));
	Ok(())
}
