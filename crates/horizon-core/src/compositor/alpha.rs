use ndarray::Array2;

use crate::consts::WEIGHT_EPSILON;
use crate::image::{ColorImage, Panorama};

/// Weighted-average compositor. Weighted color accumulates in the RGB
/// planes and the weight sum rides in the alpha plane until `finish`
/// normalizes.
pub struct AlphaCompositor {
    panorama: Panorama,
}

impl AlphaCompositor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            panorama: Panorama::zeros(height, width),
        }
    }

    pub fn append(
        &mut self,
        color: &ColorImage,
        mask: &Array2<u8>,
        weight: &Array2<f32>,
        offset_x: usize,
        offset_y: usize,
    ) {
        let (pano_h, pano_w) = self.panorama.alpha.dim();
        let (h, w) = color.dim();

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
                let wv = weight[[i, j]];
                let px = color.get(i, j);
                self.panorama.color.r[[di, dj]] += wv * px[0];
                self.panorama.color.g[[di, dj]] += wv * px[1];
                self.panorama.color.b[[di, dj]] += wv * px[2];
                self.panorama.alpha[[di, dj]] += wv;
            }
        }
    }

    pub fn finish(mut self) -> Panorama {
        let (pano_h, pano_w) = self.panorama.alpha.dim();

        for i in 0..pano_h {
            for j in 0..pano_w {
                let wv = self.panorama.alpha[[i, j]];
                if wv < WEIGHT_EPSILON {
                    self.panorama.color.set(i, j, [0.0, 0.0, 0.0]);
                    self.panorama.alpha[[i, j]] = 0.0;
                } else {
                    self.panorama.color.r[[i, j]] /= wv;
                    self.panorama.color.g[[i, j]] /= wv;
                    self.panorama.color.b[[i, j]] /= wv;
                    self.panorama.alpha[[i, j]] = 1.0;
                }
            }
        }

        self.panorama
    }
}
