use ndarray::Array2;

use crate::image::Panorama;

fn paint_red(panorama: &mut Panorama, row: usize, col: usize) {
    panorama.color.set(row, col, [1.0, 0.0, 0.0]);
    panorama.alpha[[row, col]] = 1.0;
}

/// Mark the outline of one view in opaque red: pixels on the mask's
/// rectangular edge plus valid pixels with an invalid diagonal or
/// horizontal neighbor. Columns wrap around the panorama.
pub fn draw_borders(
    panorama: &mut Panorama,
    mask: &Array2<u8>,
    offset_x: usize,
    offset_y: usize,
) {
    let (pano_h, pano_w) = panorama.alpha.dim();
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return;
    }

    for i in 0..h {
        let di = i + offset_y;
        if di >= pano_h {
            continue;
        }
        for j in [0, w - 1] {
            if mask[[i, j]] != 0 {
                paint_red(panorama, di, (j + offset_x) % pano_w);
            }
        }
    }

    for j in 0..w {
        let dj = (j + offset_x) % pano_w;
        for i in [0, h - 1] {
            let di = i + offset_y;
            if di < pano_h && mask[[i, j]] != 0 {
                paint_red(panorama, di, dj);
            }
        }
    }

    for i in 1..h.saturating_sub(1) {
        let di = i + offset_y;
        if di >= pano_h {
            continue;
        }
        for j in 1..w - 1 {
            if mask[[i, j]] == 0 {
                continue;
            }

            let surrounded = mask[[i - 1, j - 1]] != 0
                && mask[[i - 1, j + 1]] != 0
                && mask[[i, j - 1]] != 0
                && mask[[i, j + 1]] != 0
                && mask[[i + 1, j - 1]] != 0
                && mask[[i + 1, j + 1]] != 0;
            if surrounded {
                continue;
            }

            paint_red(panorama, di, (j + offset_x) % pano_w);
        }
    }
}

/// Mark label transitions in opaque red: any pixel whose diagonal or
/// horizontal neighbors carry a different owner.
pub fn draw_seams(panorama: &mut Panorama, labels: &Array2<u32>) {
    let (h, w) = labels.dim();

    for i in 1..h.saturating_sub(1) {
        for j in 1..w.saturating_sub(1) {
            let label = labels[[i, j]];

            let same = labels[[i - 1, j - 1]] == label
                && labels[[i - 1, j + 1]] == label
                && labels[[i, j - 1]] == label
                && labels[[i, j + 1]] == label
                && labels[[i + 1, j - 1]] == label
                && labels[[i + 1, j + 1]] == label;
            if same {
                continue;
            }

            paint_red(panorama, i, j);
        }
    }
}
