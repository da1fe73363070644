//! The EO GeoPackage tile store.
//!
//! A store is a single SQLite file following the GeoPackage table layout. It holds raster
//! tiles addressed by zoom level, row and column, encoded either as NPY tensors (optionally
//! compressed) or as PNG/JPEG/WebP images.
//!
//! ```rust,no_run
//! use eogpkg_container::*;
//! use eogpkg_core::*;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = StoreOptions::write(DataKind::Tensor, 4326).with_compression("zstd");
//! let store = TileStore::open(Path::new("scene.gpkg"), &options)?;
//!
//! let coord = TileCoord::new(3, 1, 2)?;
//! store.insert_tile(&coord, &Tensor::zeros(DType::F32, vec![255, 255])?)?;
//! assert_eq!(store.get_tile_data(&coord)?.shape(), &[255, 255]);
//! # Ok(())
//! # }
//! ```

mod codec;
mod lifecycle;
mod options;
mod pending;
pub mod schema;
mod store;

pub use codec::*;
pub use options::*;
pub use pending::*;
pub use store::*;
