//! Contains the data types shared by all eogpkg crates: blobs, tensors, tile keys,
//! encodings and spatial references.

mod blob;
pub use blob::*;

mod dtype;
pub use dtype::*;

mod encoding;
pub use encoding::*;

mod spatial_reference;
pub use spatial_reference::*;

mod tensor;
pub use tensor::*;

mod tile_coord;
pub use tile_coord::*;
