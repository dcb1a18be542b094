use ndarray::{s, Array2};
use tracing::debug;

use crate::consts::{PAD_MARGIN, WEIGHT_EPSILON};
use crate::error::{HorizonError, Result};
use crate::filters::convolve::{convolve5x5, convolve5x5_color, Boundary};
use crate::filters::feather::feather;
use crate::filters::resample::{
    downsample_2x, downsample_2x_color, upsample_2x_color,
};
use crate::image::{ColorImage, Panorama};

/// Pad a view so its placement and size stay on integer coordinates at the
/// coarsest of `bands` pyramid levels, with convolution slack on every side.
///
/// Returns the padded image and the corrected offset. The source lands at
/// `(offset - corrected_offset)` inside a zeroed canvas.
pub fn pad_for_pyramid<T: Clone + Default>(
    input: &Array2<T>,
    offset_x: usize,
    offset_y: usize,
    bands: usize,
) -> (Array2<T>, usize, usize) {
    debug_assert!(bands >= 1);
    let scale = 1usize << (bands - 1);

    // Snap down to the coarse grid, backing off the blur margin.
    let low_x = (offset_x / scale).saturating_sub(PAD_MARGIN);
    let low_y = (offset_y / scale).saturating_sub(PAD_MARGIN);
    let out_x = low_x * scale;
    let out_y = low_y * scale;

    let dx = offset_x - out_x;
    let dy = offset_y - out_y;

    let (h, w) = input.dim();
    let padded_w = ((w + dx).div_ceil(scale) + PAD_MARGIN) * scale;
    let padded_h = ((h + dy).div_ceil(scale) + PAD_MARGIN) * scale;

    let mut output = Array2::<T>::from_elem((padded_h, padded_w), T::default());
    output.slice_mut(s![dy..dy + h, dx..dx + w]).assign(input);

    (output, out_x, out_y)
}

pub fn pad_for_pyramid_color(
    input: &ColorImage,
    offset_x: usize,
    offset_y: usize,
    bands: usize,
) -> (ColorImage, usize, usize) {
    let (r, out_x, out_y) = pad_for_pyramid(&input.r, offset_x, offset_y, bands);
    let (g, _, _) = pad_for_pyramid(&input.g, offset_x, offset_y, bands);
    let (b, _, _) = pad_for_pyramid(&input.b, offset_x, offset_y, bands);
    (ColorImage::from_planes(r, g, b), out_x, out_y)
}

/// One pyramid level: weighted color accumulation plus the weight sum.
///
/// Between `apply` calls every pixel holds sum(c_i * w_i) in `color` and
/// sum(w_i) in `weight`, over all view contributions to that band.
#[derive(Clone, Debug)]
struct PyramidLevel {
    color: ColorImage,
    weight: Array2<f32>,
}

impl PyramidLevel {
    fn zeros(height: usize, width: usize) -> Self {
        Self {
            color: ColorImage::zeros(height, width),
            weight: Array2::zeros((height, width)),
        }
    }

    /// Divide accumulated color by accumulated weight; pixels with no
    /// meaningful weight become zero. Weights are left untouched.
    fn normalize_color(&mut self) {
        let (h, w) = self.weight.dim();
        for i in 0..h {
            for j in 0..w {
                let wv = self.weight[[i, j]];
                if wv < WEIGHT_EPSILON {
                    self.color.set(i, j, [0.0, 0.0, 0.0]);
                } else {
                    self.color.r[[i, j]] /= wv;
                    self.color.g[[i, j]] /= wv;
                    self.color.b[[i, j]] /= wv;
                }
            }
        }
    }
}

/// One reduce/expand step of the Burt-Adelson decomposition.
///
/// Returns the half-resolution color and weights plus the band-pass layer
/// at the current resolution.
fn decompose_step(
    color: &ColorImage,
    weights: &Array2<f32>,
) -> (ColorImage, Array2<f32>, ColorImage) {
    let dim = weights.dim();

    let blurred = convolve5x5_color(color, Boundary::Mirror);
    let next_color = downsample_2x_color(&blurred);

    let blurred_weights = convolve5x5(weights, Boundary::Mirror);
    let next_weights = downsample_2x(&blurred_weights);

    let up = upsample_2x_color(&next_color, dim);
    let mut low = convolve5x5_color(&up, Boundary::Mirror);
    low.map_values_inplace(|v| v * 4.0);

    let band = color - &low;
    (next_color, next_weights, band)
}

/// Multi-band accumulator for the panorama.
///
/// Level 0 is panorama-sized; each next level halves. Views are pushed in
/// with `apply`, the level count grows with `augment`, and `rebuild`
/// consumes the accumulated state into the output image.
#[derive(Clone)]
pub struct LaplacianPyramid {
    levels: Vec<PyramidLevel>,
}

impl LaplacianPyramid {
    pub fn new(base_width: usize, base_height: usize, bands: usize) -> Self {
        let bands = bands.max(1);
        let mut levels = Vec::with_capacity(bands);
        let (mut w, mut h) = (base_width, base_height);
        for _ in 0..bands {
            levels.push(PyramidLevel::zeros(h, w));
            w /= 2;
            h /= 2;
        }
        Self { levels }
    }

    pub fn bands(&self) -> usize {
        self.levels.len()
    }

    /// Decompose a padded view into band-pass layers and accumulate them
    /// with the given weights at the given panorama placement.
    pub fn apply(
        &mut self,
        source: ColorImage,
        weights: Array2<f32>,
        offset_x: usize,
        offset_y: usize,
    ) -> Result<()> {
        if source.dim() != weights.dim() {
            let (eh, ew) = source.dim();
            let (ah, aw) = weights.dim();
            return Err(HorizonError::SizeMismatch {
                expected_width: ew,
                expected_height: eh,
                actual_width: aw,
                actual_height: ah,
            });
        }

        let bands = self.levels.len();
        let mut current_color = source;
        let mut current_weights = weights;
        let (mut ox, mut oy) = (offset_x, offset_y);

        for level in 0..bands - 1 {
            let (next_color, next_weights, band) =
                decompose_step(&current_color, &current_weights);
            self.merge(&band, &current_weights, level, ox, oy);
            current_color = next_color;
            current_weights = next_weights;
            ox /= 2;
            oy /= 2;
        }

        // Low-pass residual goes into the coarsest level.
        self.merge(&current_color, &current_weights, bands - 1, ox, oy);
        Ok(())
    }

    /// Grow the pyramid to `new_bands` levels, preserving accumulated
    /// content by re-decomposing the normalized coarsest level down the
    /// new chain.
    pub fn augment(&mut self, new_bands: usize) -> Result<()> {
        let old_bands = self.levels.len();
        if new_bands <= old_bands {
            return Ok(());
        }
        debug!(old_bands, new_bands, "Augmenting pyramid");

        // Take the coarsest accumulators out; they get rewritten as part
        // of the extended chain.
        let top = self.levels.last_mut().unwrap();
        let (h, w) = top.weight.dim();
        let mut color = std::mem::replace(&mut top.color, ColorImage::zeros(h, w));
        let weights = std::mem::replace(&mut top.weight, Array2::zeros((h, w)));

        let mut mask = Array2::<u8>::zeros((h, w));
        for i in 0..h {
            for j in 0..w {
                let wv = weights[[i, j]];
                if wv < WEIGHT_EPSILON {
                    color.set(i, j, [0.0, 0.0, 0.0]);
                } else {
                    color.r[[i, j]] /= wv;
                    color.g[[i, j]] /= wv;
                    color.b[[i, j]] /= wv;
                    mask[[i, j]] = 1;
                }
            }
        }

        let mut current_color = feather(&color, &mask);
        let mut current_weights = weights;

        for _ in old_bands..new_bands {
            let (prev_h, prev_w) = self.levels.last().unwrap().weight.dim();
            self.levels.push(PyramidLevel::zeros(prev_h / 2, prev_w / 2));
        }

        for level in (old_bands - 1)..(new_bands - 1) {
            let (next_color, next_weights, band) =
                decompose_step(&current_color, &current_weights);
            self.merge(&band, &current_weights, level, 0, 0);
            current_color = next_color;
            current_weights = next_weights;
        }

        self.merge(&current_color, &current_weights, new_bands - 1, 0, 0);
        Ok(())
    }

    /// Accumulate a band image into one level. Columns wrap around the
    /// level width; rows past the level height are dropped.
    fn merge(
        &mut self,
        band: &ColorImage,
        weight: &Array2<f32>,
        level: usize,
        offset_x: usize,
        offset_y: usize,
    ) {
        let target = &mut self.levels[level];
        let (level_h, level_w) = target.weight.dim();
        if level_h == 0 || level_w == 0 {
            return;
        }

        let (h, w) = weight.dim();
        for i in 0..h {
            let di = i + offset_y;
            if di >= level_h {
                continue;
            }
            for j in 0..w {
                let dj = (j + offset_x) % level_w;
                let wv = weight[[i, j]];
                target.color.r[[di, dj]] += band.r[[i, j]] * wv;
                target.color.g[[di, dj]] += band.g[[i, j]] * wv;
                target.color.b[[di, dj]] += band.b[[i, j]] * wv;
                target.weight[[di, dj]] += wv;
            }
        }
    }

    /// Normalize every level, collapse the band stack from coarse to fine
    /// and emit the RGBA panorama. The expand convolutions wrap
    /// horizontally: the panorama is cylindrically periodic and a mirrored
    /// edge would leave a visible seam at longitude 0.
    pub fn rebuild(mut self) -> Panorama {
        for level in &mut self.levels {
            level.normalize_color();
        }

        let bands = self.levels.len();
        for level in (0..bands - 1).rev() {
            let (fine_levels, coarse_levels) = self.levels.split_at_mut(level + 1);
            let fine = &mut fine_levels[level];
            let coarse = &coarse_levels[0];

            let up = upsample_2x_color(&coarse.color, fine.weight.dim());
            let mut low = convolve5x5_color(&up, Boundary::Wrap);
            low.map_values_inplace(|v| v * 4.0);
            fine.color += &low;
        }

        let base = self.levels.into_iter().next().unwrap();
        let alpha = base
            .weight
            .mapv(|w| if w < WEIGHT_EPSILON { 0.0 } else { 1.0 });

        Panorama {
            color: base.color,
            alpha,
        }
    }
}
