use std::path::Path;

use image::{ImageFormat, Rgba};

use crate::error::Result;
use crate::image::Panorama;

/// Save a tone-mapped 8-bit RGBA preview of the panorama.
///
/// Reinhard tone mapping keeps HDR highlights printable; a 2.2 gamma
/// approximates sRGB. Uncovered pixels stay fully transparent.
pub fn save_preview_png(panorama: &Panorama, path: &Path) -> Result<()> {
    let h = panorama.height();
    let w = panorama.width();

    let tone_map = |v: f32| -> u8 {
        let v = v.max(0.0);
        let mapped = (v / (1.0 + v)).powf(1.0 / 2.2);
        (mapped * 255.0).round() as u8
    };

    let mut img = image::RgbaImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let [r, g, b] = panorama.color.get(row, col);
            let a = if panorama.alpha[[row, col]] > 0.0 { 255 } else { 0 };
            img.put_pixel(
                col as u32,
                row as u32,
                Rgba([tone_map(r), tone_map(g), tone_map(b), a]),
            );
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
