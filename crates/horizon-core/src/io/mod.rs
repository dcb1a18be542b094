pub mod exr_io;
pub mod preview;
