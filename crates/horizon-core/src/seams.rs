use ndarray::Array2;

use crate::error::{HorizonError, Result};
use crate::image::NO_LABEL;

/// Panorama-sized argmax-on-weight ownership map.
///
/// Each panorama pixel records the id of the view with the highest weight
/// seen so far. The comparison is strict, so on equal weights the first
/// writer keeps the pixel.
pub struct SeamLabeler {
    weights: Array2<f32>,
    labels: Array2<u32>,
}

impl SeamLabeler {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            weights: Array2::zeros((height, width)),
            labels: Array2::from_elem((height, width), NO_LABEL),
        }
    }

    /// Fold one view's validity mask and weight map into the label map.
    pub fn append(
        &mut self,
        mask: &Array2<u8>,
        weight: &Array2<f32>,
        view_id: u32,
        offset_x: usize,
        offset_y: usize,
    ) -> Result<()> {
        if mask.dim() != weight.dim() {
            let (eh, ew) = mask.dim();
            let (ah, aw) = weight.dim();
            return Err(HorizonError::SizeMismatch {
                expected_width: ew,
                expected_height: eh,
                actual_width: aw,
                actual_height: ah,
            });
        }

        let (pano_h, pano_w) = self.weights.dim();
        let (h, w) = mask.dim();

        for i in 0..h {
            let di = i + offset_y;
            if di >= pano_h {
                continue;
            }
            for j in 0..w {
                if mask[[i, j]] == 0 {
                    continue;
                }
                let dj = (j + offset_x) % pano_w;
                if weight[[i, j]] > self.weights[[di, dj]] {
                    self.labels[[di, dj]] = view_id;
                    self.weights[[di, dj]] = weight[[i, j]];
                }
            }
        }

        Ok(())
    }

    pub fn into_labels(self) -> Array2<u32> {
        self.labels
    }
}

/// Binary weight map for one view: 1.0 exactly where the label map assigns
/// the panorama pixel to that view. Feeding these hard weights into the
/// multi-band compositor makes every pixel owned by one view at the lowest
/// band while higher bands still overlap smoothly.
pub fn seam_mask_for_view(
    labels: &Array2<u32>,
    view_id: u32,
    width: usize,
    height: usize,
    offset_x: usize,
    offset_y: usize,
) -> Array2<f32> {
    let (pano_h, pano_w) = labels.dim();
    let mut out = Array2::<f32>::zeros((height, width));

    for i in 0..height {
        let di = i + offset_y;
        if di >= pano_h {
            continue;
        }
        for j in 0..width {
            let dj = (j + offset_x) % pano_w;
            if labels[[di, dj]] == view_id {
                out[[i, j]] = 1.0;
            }
        }
    }

    out
}
