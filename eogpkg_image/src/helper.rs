//! Test images: 256 x 128 gradients in every supported layout.

use eogpkg_core::Tensor;

const WIDTH: usize = 256;
const HEIGHT: usize = 128;

fn create_tensor(channels: usize, pixel: fn(usize, usize) -> [u8; 4]) -> Tensor {
	let mut data = Vec::with_capacity(WIDTH * HEIGHT * channels);
	for y in 0..HEIGHT {
		for x in 0..WIDTH {
			data.extend_from_slice(&pixel(x, y)[..channels]);
		}
	}
	let shape = if channels == 1 {
		vec![HEIGHT, WIDTH]
	} else {
		vec![HEIGHT, WIDTH, channels]
	};
	Tensor::from_vec(shape, data).unwrap()
}

pub fn create_tensor_grey() -> Tensor {
	create_tensor(1, |x, _y| [x as u8, 0, 0, 0])
}

pub fn create_tensor_greya() -> Tensor {
	create_tensor(2, |x, y| [x as u8, (y * 2) as u8, 0, 0])
}

pub fn create_tensor_rgb() -> Tensor {
	create_tensor(3, |x, y| [x as u8, (255 - x) as u8, (y * 2) as u8, 0])
}

pub fn create_tensor_rgba() -> Tensor {
	create_tensor(4, |x, y| [x as u8, (255 - x) as u8, (y * 2) as u8, (255 - y) as u8])
}

/// Mean absolute difference over all elements of two `uint8` tensors of equal shape.
pub fn mean_abs_diff(a: &Tensor, b: &Tensor) -> f64 {
	assert_eq!(a.shape(), b.shape());
	let sum: u64 = a
		.as_bytes()
		.iter()
		.zip(b.as_bytes())
		.map(|(x, y)| u64::from(x.abs_diff(*y)))
		.sum();
	sum as f64 / a.byte_len() as f64
}
