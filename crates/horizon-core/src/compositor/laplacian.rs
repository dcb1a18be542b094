use ndarray::Array2;
use tracing::debug;

use crate::consts::{LOG_FLOOR, MIN_BAND_EXTENT};
use crate::error::{HorizonError, Result};
use crate::filters::feather::feather;
use crate::image::{ColorImage, Panorama};
use crate::pyramid::{pad_for_pyramid, pad_for_pyramid_color, LaplacianPyramid};

/// Deepest useful band count for a view of the given dimensions: the
/// coarsest level keeps at least `MIN_BAND_EXTENT` pixels on its short
/// side.
pub fn optimal_scale(width: usize, height: usize) -> usize {
    let minsize = width.min(height);
    if minsize < MIN_BAND_EXTENT {
        return 0;
    }
    (minsize / MIN_BAND_EXTENT).ilog2() as usize
}

/// Multi-band compositor: feathers each view, moves it to log space and
/// pushes it through the Laplacian pyramid accumulator.
///
/// Views must arrive in non-decreasing `optimal_scale` order. The pyramid
/// grows when a view wants more bands; a view wanting fewer than the
/// current count indicates a mis-ordered driver and fails fast.
pub struct LaplacianCompositor {
    pyramid: LaplacianPyramid,
}

impl LaplacianCompositor {
    pub fn new(width: usize, height: usize, initial_bands: usize) -> Self {
        Self {
            pyramid: LaplacianPyramid::new(width, height, initial_bands),
        }
    }

    pub fn bands(&self) -> usize {
        self.pyramid.bands()
    }

    pub fn append(
        &mut self,
        color: ColorImage,
        mask: Array2<u8>,
        weight: Array2<f32>,
        offset_x: usize,
        offset_y: usize,
    ) -> Result<()> {
        if color.dim() != mask.dim() || color.dim() != weight.dim() {
            let (eh, ew) = color.dim();
            let (ah, aw) = mask.dim();
            return Err(HorizonError::SizeMismatch {
                expected_width: ew,
                expected_height: eh,
                actual_width: aw,
                actual_height: ah,
            });
        }

        let optimal = optimal_scale(color.width(), color.height());
        let current = self.pyramid.bands();
        if optimal < current {
            return Err(HorizonError::DegenerateScale { optimal, current });
        }
        if optimal > current {
            self.pyramid.augment(optimal)?;
        }
        let bands = self.pyramid.bands();

        let (padded_color, new_x, new_y) =
            pad_for_pyramid_color(&color, offset_x, offset_y, bands);
        let (padded_mask, _, _) = pad_for_pyramid(&mask, offset_x, offset_y, bands);
        let (padded_weight, _, _) = pad_for_pyramid(&weight, offset_x, offset_y, bands);
        debug!(
            width = padded_color.width(),
            height = padded_color.height(),
            offset_x = new_x,
            offset_y = new_y,
            "Padded view for {bands} bands"
        );

        let mut feathered = feather(&padded_color, &padded_mask);

        // Log space: exposure differences become additive, so linear
        // band-pass blending stays physically sensible for HDR input.
        feathered.map_values_inplace(|v| v.max(LOG_FLOOR).ln());

        self.pyramid.apply(feathered, padded_weight, new_x, new_y)
    }

    pub fn finish(self) -> Panorama {
        let mut panorama = self.pyramid.rebuild();
        // Back to linear space.
        panorama.color.map_values_inplace(f32::exp);
        panorama
    }
}
