pub mod alpha;
pub mod laplacian;
pub mod replace;

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::image::{ColorImage, Panorama};

pub use alpha::AlphaCompositor;
pub use laplacian::LaplacianCompositor;
pub use replace::ReplaceCompositor;

/// Which compositing algorithm the driver runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompositorKind {
    /// Last writer wins; no blending.
    Replace,
    /// Weighted per-pixel average.
    Alpha,
    /// Multi-band Laplacian blending.
    #[default]
    Multiband,
}

impl fmt::Display for CompositorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositorKind::Replace => write!(f, "replace"),
            CompositorKind::Alpha => write!(f, "alpha"),
            CompositorKind::Multiband => write!(f, "multiband"),
        }
    }
}

/// Compositor chosen at construction; the driver treats the choice
/// opaquely through `append` and `finish`.
pub enum Compositor {
    Replace(ReplaceCompositor),
    Alpha(AlphaCompositor),
    Multiband(LaplacianCompositor),
}

impl Compositor {
    pub fn new(kind: CompositorKind, width: usize, height: usize, initial_bands: usize) -> Self {
        match kind {
            CompositorKind::Replace => Compositor::Replace(ReplaceCompositor::new(width, height)),
            CompositorKind::Alpha => Compositor::Alpha(AlphaCompositor::new(width, height)),
            CompositorKind::Multiband => {
                Compositor::Multiband(LaplacianCompositor::new(width, height, initial_bands))
            }
        }
    }

    /// Fold one view into the panorama.
    pub fn append(
        &mut self,
        color: ColorImage,
        mask: Array2<u8>,
        weight: Array2<f32>,
        offset_x: usize,
        offset_y: usize,
    ) -> Result<()> {
        match self {
            Compositor::Replace(c) => {
                c.append(&color, &mask, offset_x, offset_y);
                Ok(())
            }
            Compositor::Alpha(c) => {
                c.append(&color, &mask, &weight, offset_x, offset_y);
                Ok(())
            }
            Compositor::Multiband(c) => c.append(color, mask, weight, offset_x, offset_y),
        }
    }

    /// Produce the final RGBA panorama.
    pub fn finish(self) -> Panorama {
        match self {
            Compositor::Replace(c) => c.finish(),
            Compositor::Alpha(c) => c.finish(),
            Compositor::Multiband(c) => c.finish(),
        }
    }
}
