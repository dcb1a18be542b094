use ndarray::Array2;

use horizon_core::image::ColorImage;

/// Constant-color image of the given size.
pub fn constant_color(height: usize, width: usize, rgb: [f32; 3]) -> ColorImage {
    ColorImage::from_elem(height, width, rgb)
}

/// Fully valid mask.
pub fn full_mask(height: usize, width: usize) -> Array2<u8> {
    Array2::from_elem((height, width), 1u8)
}

/// Constant weight map.
pub fn constant_weight(height: usize, width: usize, value: f32) -> Array2<f32> {
    Array2::from_elem((height, width), value)
}
