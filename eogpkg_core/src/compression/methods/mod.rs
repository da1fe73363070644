mod brotli;
mod deflate;
mod lz4;
mod zstd;

pub use brotli::*;
pub use deflate::*;
pub use lz4::*;
pub use zstd::*;
