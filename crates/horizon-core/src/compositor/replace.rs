use ndarray::Array2;

use crate::image::{ColorImage, Panorama};

/// Simplest compositor: each valid pixel overwrites the panorama.
pub struct ReplaceCompositor {
    panorama: Panorama,
}

impl ReplaceCompositor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            panorama: Panorama::zeros(height, width),
        }
    }

    pub fn append(
        &mut self,
        color: &ColorImage,
        mask: &Array2<u8>,
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
                self.panorama.color.set(di, dj, color.get(i, j));
                self.panorama.alpha[[di, dj]] = 1.0;
            }
        }
    }

    pub fn finish(self) -> Panorama {
        self.panorama
    }
}
