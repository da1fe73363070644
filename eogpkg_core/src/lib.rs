//! Core types of the EO GeoPackage tile store.
//!
//! Contains the byte container [`Blob`], numeric [`Tensor`]s and their NPY serialisation,
//! the general-purpose byte compressors, the closed set of tile encodings, tile
//! coordinates, the spatial reference registry and the [`StoreError`] taxonomy.

pub mod compression;

mod error;
pub use error::*;

pub mod npy;

pub mod types;
pub use types::*;
