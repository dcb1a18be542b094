use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{BINOMIAL_KERNEL, PARALLEL_PIXEL_THRESHOLD};
use crate::image::ColorImage;

const RADIUS: isize = 2;

/// Horizontal boundary handling for the separable blur.
///
/// The vertical boundary is always mirrored; columns mirror on local view
/// canvases and wrap on panorama-space images, where longitude 0 and the
/// last column are neighbors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Reflect at the edges: index -k maps to +k, index n+k maps to n-2-k.
    Mirror,
    /// Periodic: index taken modulo width.
    Wrap,
}

fn mirror_index(idx: isize, len: usize) -> usize {
    let n = len as isize;
    if n == 1 {
        return 0;
    }
    let mut i = idx;
    while i < 0 || i >= n {
        if i < 0 {
            i = -i;
        } else {
            i = 2 * n - 2 - i;
        }
    }
    i as usize
}

fn wrap_index(idx: isize, len: usize) -> usize {
    idx.rem_euclid(len as isize) as usize
}

fn resolve_index(idx: isize, len: usize, boundary: Boundary) -> usize {
    match boundary {
        Boundary::Mirror => mirror_index(idx, len),
        Boundary::Wrap => wrap_index(idx, len),
    }
}

/// 5x5 binomial blur as a horizontal pass followed by a vertical pass.
pub fn convolve5x5(input: &Array2<f32>, horizontal: Boundary) -> Array2<f32> {
    let rows = convolve_rows(input, horizontal);
    convolve_cols(&rows)
}

pub fn convolve5x5_color(input: &ColorImage, horizontal: Boundary) -> ColorImage {
    input.map(|plane| convolve5x5(plane, horizontal))
}

fn convolve_rows(data: &Array2<f32>, boundary: Boundary) -> Array2<f32> {
    let (h, w) = data.dim();
    let run = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                let mut sumw = 0.0f32;
                for (k, &kv) in BINOMIAL_KERNEL.iter().enumerate() {
                    let src_col = resolve_index(col as isize + k as isize - RADIUS, w, boundary);
                    sum += data[[row, src_col]] * kv;
                    sumw += kv;
                }
                sum / sumw
            })
            .collect()
    };
    collect_rows(h, w, run)
}

fn convolve_cols(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let run = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                let mut sumw = 0.0f32;
                for (k, &kv) in BINOMIAL_KERNEL.iter().enumerate() {
                    let src_row = mirror_index(row as isize + k as isize - RADIUS, h);
                    sum += data[[src_row, col]] * kv;
                    sumw += kv;
                }
                sum / sumw
            })
            .collect()
    };
    collect_rows(h, w, run)
}

fn collect_rows(h: usize, w: usize, run: impl Fn(usize) -> Vec<f32> + Sync) -> Array2<f32> {
    let mut result = Array2::<f32>::zeros((h, w));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h).into_par_iter().map(&run).collect();
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            for (col, val) in run(row).into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    }

    result
}
