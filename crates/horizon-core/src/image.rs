use ndarray::Array2;

/// Label value meaning "no view owns this pixel".
pub const NO_LABEL: u32 = u32::MAX;

/// Linear RGB image stored as three float planes.
/// Planes are row-major with shape = (height, width).
#[derive(Clone, Debug)]
pub struct ColorImage {
    pub r: Array2<f32>,
    pub g: Array2<f32>,
    pub b: Array2<f32>,
}

impl ColorImage {
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            r: Array2::zeros((height, width)),
            g: Array2::zeros((height, width)),
            b: Array2::zeros((height, width)),
        }
    }

    pub fn from_planes(r: Array2<f32>, g: Array2<f32>, b: Array2<f32>) -> Self {
        debug_assert_eq!(r.dim(), g.dim());
        debug_assert_eq!(r.dim(), b.dim());
        Self { r, g, b }
    }

    pub fn from_elem(height: usize, width: usize, rgb: [f32; 3]) -> Self {
        Self {
            r: Array2::from_elem((height, width), rgb[0]),
            g: Array2::from_elem((height, width), rgb[1]),
            b: Array2::from_elem((height, width), rgb[2]),
        }
    }

    pub fn width(&self) -> usize {
        self.r.ncols()
    }

    pub fn height(&self) -> usize {
        self.r.nrows()
    }

    /// (height, width)
    pub fn dim(&self) -> (usize, usize) {
        self.r.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> [f32; 3] {
        [self.r[[row, col]], self.g[[row, col]], self.b[[row, col]]]
    }

    pub fn set(&mut self, row: usize, col: usize, rgb: [f32; 3]) {
        self.r[[row, col]] = rgb[0];
        self.g[[row, col]] = rgb[1];
        self.b[[row, col]] = rgb[2];
    }

    /// Apply a plane-wise transform, e.g. a blur or resample pass.
    pub fn map(&self, f: impl Fn(&Array2<f32>) -> Array2<f32>) -> ColorImage {
        ColorImage {
            r: f(&self.r),
            g: f(&self.g),
            b: f(&self.b),
        }
    }

    /// Apply an element transform in place on all three planes.
    pub fn map_values_inplace(&mut self, f: impl Fn(f32) -> f32 + Copy) {
        self.r.mapv_inplace(f);
        self.g.mapv_inplace(f);
        self.b.mapv_inplace(f);
    }
}

impl std::ops::AddAssign<&ColorImage> for ColorImage {
    fn add_assign(&mut self, rhs: &ColorImage) {
        self.r += &rhs.r;
        self.g += &rhs.g;
        self.b += &rhs.b;
    }
}

impl std::ops::Sub<&ColorImage> for &ColorImage {
    type Output = ColorImage;

    fn sub(self, rhs: &ColorImage) -> ColorImage {
        ColorImage {
            r: &self.r - &rhs.r,
            g: &self.g - &rhs.g,
            b: &self.b - &rhs.b,
        }
    }
}

/// RGBA float panorama: color planes plus a coverage alpha plane.
#[derive(Clone, Debug)]
pub struct Panorama {
    pub color: ColorImage,
    pub alpha: Array2<f32>,
}

impl Panorama {
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            color: ColorImage::zeros(height, width),
            alpha: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.alpha.ncols()
    }

    pub fn height(&self) -> usize {
        self.alpha.nrows()
    }
}
