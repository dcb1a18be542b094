use ndarray::Array2;

use horizon_core::filters::convolve::{convolve5x5, Boundary};
use horizon_core::filters::resample::{downsample_2x, upsample_2x};

#[test]
fn test_downsample_takes_even_pixels() {
    let data = Array2::from_shape_fn((4, 6), |(i, j)| (i * 10 + j) as f32);
    let result = downsample_2x(&data);

    assert_eq!(result.dim(), (2, 3));
    assert_eq!(result[[0, 0]], 0.0);
    assert_eq!(result[[0, 1]], 2.0);
    assert_eq!(result[[1, 0]], 20.0);
    assert_eq!(result[[1, 2]], 24.0);
}

#[test]
fn test_downsample_floors_odd_dimensions() {
    let data = Array2::<f32>::zeros((5, 7));
    assert_eq!(downsample_2x(&data).dim(), (2, 3));
}

#[test]
fn test_upsample_bottom_right_placement() {
    let data = Array2::from_shape_fn((2, 2), |(i, j)| (i * 2 + j + 1) as f32);
    let result = upsample_2x(&data, (4, 4));

    assert_eq!(result[[1, 1]], 1.0);
    assert_eq!(result[[1, 3]], 2.0);
    assert_eq!(result[[3, 1]], 3.0);
    assert_eq!(result[[3, 3]], 4.0);

    // The other three samples of each 2x2 block stay zero.
    assert_eq!(result[[0, 0]], 0.0);
    assert_eq!(result[[0, 1]], 0.0);
    assert_eq!(result[[1, 0]], 0.0);
    assert_eq!(result[[2, 2]], 0.0);
}

#[test]
fn test_upsample_into_odd_dimensions() {
    let data = Array2::from_elem((2, 2), 5.0f32);
    let result = upsample_2x(&data, (5, 5));

    assert_eq!(result.dim(), (5, 5));
    assert_eq!(result[[3, 3]], 5.0);
    // Overflow row and column stay zero.
    for j in 0..5 {
        assert_eq!(result[[4, j]], 0.0);
    }
}

#[test]
fn test_expand_energy_restored_by_factor_four() {
    // Upsample a constant, blur, multiply by four: the original level
    // comes back exactly because three of four samples were zeroed.
    let data = Array2::from_elem((4, 4), 1.0f32);
    let up = upsample_2x(&data, (8, 8));
    let mut blurred = convolve5x5(&up, Boundary::Mirror);
    blurred.mapv_inplace(|v| v * 4.0);

    for &v in blurred.iter() {
        assert!((v - 1.0).abs() < 1e-6);
    }
}
