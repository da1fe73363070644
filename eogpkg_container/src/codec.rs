use anyhow::Result;
use eogpkg_core::{
	Blob, Tensor, TileEncoding,
	compression::{compress, decompress},
	npy::{npy_to_tensor, tensor_to_npy},
};
use eogpkg_derive::context;

/// Converts tensors to tile payloads and back, for exactly one [`TileEncoding`].
///
/// A codec is owned by its store and fixed for the store's lifetime, so every payload of a
/// file is encoded the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCodec {
	encoding: TileEncoding,
	quality: Option<u8>,
}

impl TileCodec {
	/// `quality` is only used by lossy image codecs.
	pub fn new(encoding: TileEncoding, quality: Option<u8>) -> TileCodec {
		TileCodec { encoding, quality }
	}

	pub fn encoding(&self) -> TileEncoding {
		self.encoding
	}

	#[context("encoding {tensor:?} as {}", self.encoding)]
	pub fn encode(&self, tensor: &Tensor) -> Result<Blob> {
		match self.encoding {
			TileEncoding::TensorRaw => tensor_to_npy(tensor),
			TileEncoding::TensorCompressed(compression) => compress(&tensor_to_npy(tensor)?, compression),
			TileEncoding::ImageRaster(codec) => eogpkg_image::encode(tensor, codec, self.quality),
		}
	}

	#[context("decoding {} byte payload as {}", blob.len(), self.encoding)]
	pub fn decode(&self, blob: &Blob) -> Result<Tensor> {
		match self.encoding {
			TileEncoding::TensorRaw => npy_to_tensor(blob.as_slice()),
			TileEncoding::TensorCompressed(compression) => npy_to_tensor(decompress(blob, compression)?.as_slice()),
			TileEncoding::ImageRaster(codec) => eogpkg_image::decode(blob, codec),
		}
	}
}
