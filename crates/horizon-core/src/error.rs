use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EXR error: {0}")]
    Exr(#[from] exr::error::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid scene manifest: {0}")]
    Scene(#[from] serde_json::Error),

    #[error("Missing metadata key '{key}' in {}", path.display())]
    MetadataMissing { key: String, path: PathBuf },

    #[error("Missing channel '{name}' in {}", path.display())]
    MissingChannel { name: String, path: PathBuf },

    #[error("Image size mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    SizeMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("View optimal scale {optimal} is below the current band count {current}")]
    DegenerateScale { optimal: usize, current: usize },

    #[error("Invalid panorama size: {width}x{height}")]
    InvalidPanoramaSize { width: usize, height: usize },

    #[error("Scene contains no reconstructed views")]
    EmptyScene,
}

pub type Result<T> = std::result::Result<T, HorizonError>;
