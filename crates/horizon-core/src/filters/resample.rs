use ndarray::Array2;

use crate::image::ColorImage;

/// Downsample by 2x taking every other pixel. Callers blur first.
pub fn downsample_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h / 2, w / 2));

    for i in 0..h / 2 {
        for j in 0..w / 2 {
            result[[i, j]] = data[[i * 2, j * 2]];
        }
    }

    result
}

pub fn downsample_2x_color(data: &ColorImage) -> ColorImage {
    data.map(downsample_2x)
}

/// Upsample by 2x into an output of the given (height, width).
///
/// Each source pixel lands at the bottom-right of its 2x2 block; the other
/// three samples stay zero. Callers blur the result and multiply by 4 to
/// restore the energy carried by the zeroed samples; the placement and the
/// factor form a pair and must not change independently.
pub fn upsample_2x(data: &Array2<f32>, out_dim: (usize, usize)) -> Array2<f32> {
    let (h, w) = data.dim();
    let (out_h, out_w) = out_dim;
    let mut result = Array2::<f32>::zeros((out_h, out_w));

    for i in 0..h {
        let di = i * 2 + 1;
        if di >= out_h {
            break;
        }
        for j in 0..w {
            let dj = j * 2 + 1;
            if dj >= out_w {
                break;
            }
            result[[di, dj]] = data[[i, j]];
        }
    }

    result
}

pub fn upsample_2x_color(data: &ColorImage, out_dim: (usize, usize)) -> ColorImage {
    data.map(|plane| upsample_2x(plane, out_dim))
}
