//! Integration tests for all-or-nothing store creation.

use anyhow::{Result, bail};
use eogpkg_container::*;
use eogpkg_core::*;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

fn entries(dir: &TempDir) -> Result<Vec<String>> {
	let mut names = fs::read_dir(dir.path())?
		.map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
		.collect::<Result<Vec<_>>>()?;
	names.sort();
	Ok(names)
}

#[test]
fn committed_store_is_readable() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.path().join("scene.gpkg");
	let coord = TileCoord::new(6, 20, 33)?;
	let tensor = Tensor::from_vec(vec![2, 2], vec![0.5f64, 1.5, 2.5, 3.5])?;

	let pending = TileStore::create_atomic(&path, &StoreOptions::write(DataKind::Tensor, 4326).with_compression("lz4"))?;
	let temp_name = pending.temp_path().file_name().unwrap().to_string_lossy().into_owned();
	assert!(temp_name.starts_with(".scene.gpkg."), "{temp_name}");
	assert!(temp_name.ends_with(".tmp"), "{temp_name}");
	assert!(!path.exists());

	pending.insert_tile(&coord, &tensor)?;
	assert_eq!(pending.commit()?, path);
	assert_eq!(entries(&dir)?, vec!["scene.gpkg"]);

	let store = TileStore::open(&path, &StoreOptions::read())?;
	assert_eq!(store.encoding(), TileEncoding::TensorCompressed(TensorCompression::Lz4));
	assert_eq!(store.get_tile_data(&coord)?, tensor);
	Ok(())
}

#[test]
fn uncommitted_store_leaves_nothing_behind() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.path().join("scene.gpkg");

	let generate = || -> Result<PathBuf> {
		let pending = TileStore::create_atomic(&path, &StoreOptions::write(DataKind::Image, 4326))?;
		pending.insert_tile(&TileCoord::new(0, 0, 0)?, &Tensor::zeros(DType::U8, vec![8, 8, 3])?)?;
		assert!(pending.temp_path().exists());
		bail!("tile generation failed halfway");
	};
	assert_eq!(generate().unwrap_err().to_string(), "tile generation failed halfway");

	assert!(entries(&dir)?.is_empty());
	Ok(())
}

#[test]
fn existing_target_requires_overwrite() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.path().join("scene.gpkg");
	fs::write(&path, b"previous content")?;

	let err = TileStore::create_atomic(&path, &StoreOptions::write(DataKind::Tensor, 4326)).unwrap_err();
	assert_eq!(error_kind(&err), Some("file_state"));

	let options = StoreOptions::write(DataKind::Tensor, 4326).with_overwrite(true);
	let pending = TileStore::create_atomic(&path, &options)?;
	// The previous file survives until the commit.
	assert_eq!(fs::read(&path)?, b"previous content");
	pending.commit()?;

	assert_eq!(TileStore::open(&path, &StoreOptions::read())?.tile_count()?, 0);
	assert_eq!(entries(&dir)?, vec!["scene.gpkg"]);
	Ok(())
}

#[test]
fn atomic_creation_requires_write_mode() -> Result<()> {
	let dir = TempDir::new()?;
	let path = dir.path().join("scene.gpkg");
	let err = TileStore::create_atomic(&path, &StoreOptions::read()).unwrap_err();
	assert_eq!(error_kind(&err), Some("configuration"));

	let err = TileStore::create_atomic(&path, &StoreOptions::write(DataKind::Tensor, 3857)).unwrap_err();
	assert_eq!(error_kind(&err), Some("configuration"));
	assert!(entries(&dir)?.is_empty());
	Ok(())
}
