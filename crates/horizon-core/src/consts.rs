/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Binomial 5-tap kernel coefficients: [1, 4, 6, 4, 1] / 16.
pub const BINOMIAL_KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Accumulated weight below this is treated as "no contribution".
pub const WEIGHT_EPSILON: f32 = 1e-6;

/// Lower clamp applied to linear color before taking the natural log.
pub const LOG_FLOOR: f32 = 1e-8;

/// Convolution slack added around a view when padding it for a pyramid.
pub const PAD_MARGIN: usize = 3;

/// Shortest side a view keeps at its deepest useful pyramid level.
pub const MIN_BAND_EXTENT: usize = 8;
