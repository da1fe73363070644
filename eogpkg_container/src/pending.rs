//! All-or-nothing creation of a store.
//!
//! [`TileStore::create_atomic`] writes into a hidden sibling of the target
//! (`.<name>.<uuid>.tmp`). Only [`PendingTileStore::commit`] moves the finished file into
//! place; a pending store that is dropped, for example because tile generation failed
//! halfway, removes its temporary file and leaves the target untouched.

use crate::{OpenRequest, StoreOptions, TileStore, lifecycle};
use anyhow::{Context, Result, bail, ensure};
use eogpkg_core::StoreError;
use eogpkg_derive::context;
use std::{
	fs,
	ops::Deref,
	path::{Path, PathBuf},
};

/// A store being written to a temporary file. Dereferences to the [`TileStore`].
#[derive(Debug)]
pub struct PendingTileStore {
	store: Option<TileStore>,
	temp_path: PathBuf,
	target: PathBuf,
}

impl TileStore {
	/// Creates a store that only appears at `path` once it is committed.
	///
	/// `options` must be in write mode. An existing file at `path` is only replaced if
	/// `overwrite` is set, and not before the commit.
	#[context("creating store '{}' atomically", path.display())]
	pub fn create_atomic(path: &Path, options: &StoreOptions) -> Result<PendingTileStore> {
		let request = match options.validate()? {
			OpenRequest::Write(request) => request,
			OpenRequest::Read => bail!(StoreError::Configuration(String::from(
				"atomic creation requires write mode"
			))),
		};
		ensure!(
			request.overwrite || !path.exists(),
			StoreError::FileState(format!(
				"'{}' already exists and overwrite is not set",
				path.display()
			))
		);

		let temp_path = temp_path_for(path)?;
		log::debug!("creating {path:?} via {temp_path:?}");
		let store = lifecycle::create(&temp_path, &request)?;

		Ok(PendingTileStore {
			store: Some(store),
			temp_path,
			target: path.to_path_buf(),
		})
	}
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
	let name = path
		.file_name()
		.with_context(|| format!("'{}' has no file name", path.display()))?;
	let temp_name = format!(".{}.{}.tmp", name.to_string_lossy(), uuid::Uuid::new_v4());
	Ok(path.with_file_name(temp_name))
}

impl PendingTileStore {
	/// Where the store is written until it is committed.
	pub fn temp_path(&self) -> &Path {
		&self.temp_path
	}

	/// Where the store will appear.
	pub fn target(&self) -> &Path {
		&self.target
	}

	/// Closes the store and moves it into place.
	#[context("committing '{}'", self.target.display())]
	pub fn commit(mut self) -> Result<PathBuf> {
		if let Some(store) = self.store.take() {
			store.close()?;
		}
		fs::rename(&self.temp_path, &self.target)?;
		log::debug!("committed {:?}", self.target);
		Ok(self.target.clone())
	}
}

impl Deref for PendingTileStore {
	type Target = TileStore;

	fn deref(&self) -> &TileStore {
		// `store` is only taken by `commit`, which consumes `self`.
		self.store.as_ref().expect("pending store is open until committed")
	}
}

impl Drop for PendingTileStore {
	fn drop(&mut self) {
		drop(self.store.take());
		// After a successful commit the temporary file has been renamed away.
		if self.temp_path.exists() {
			log::debug!("discarding uncommitted {:?}", self.temp_path);
			if let Err(error) = fs::remove_file(&self.temp_path) {
				log::warn!("could not remove {:?}: {error}", self.temp_path);
			}
		}
	}
}
