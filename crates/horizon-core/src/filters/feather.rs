use ndarray::Array2;

use crate::image::ColorImage;

/// Fill masked-out pixels with color pulled from the nearest valid regions.
///
/// Builds a half-resolution pyramid where each coarse pixel averages
/// whichever of its four fine pixels are valid, then walks back up copying
/// coarser colors into invalid fine pixels. Valid pixels are untouched, so
/// the operation is idempotent. A blur over the result no longer bleeds
/// zeros from undefined areas into valid ones.
pub fn feather(color: &ColorImage, mask: &Array2<u8>) -> ColorImage {
    let mut colors: Vec<ColorImage> = vec![color.clone()];
    let mut masks: Vec<Array2<u8>> = vec![mask.clone()];

    loop {
        let src = colors.last().unwrap();
        let src_mask = masks.last().unwrap();
        let (h, w) = src_mask.dim();
        let (half_h, half_w) = (h / 2, w / 2);
        if half_h < 1 || half_w < 1 {
            break;
        }

        let mut half = ColorImage::zeros(half_h, half_w);
        let mut half_mask = Array2::<u8>::zeros((half_h, half_w));

        for i in 0..half_h {
            for j in 0..half_w {
                let (di, dj) = (i * 2, j * 2);
                let mut acc = [0.0f32; 3];
                let mut count = 0u32;

                for (si, sj) in [(di, dj), (di, dj + 1), (di + 1, dj), (di + 1, dj + 1)] {
                    if src_mask[[si, sj]] != 0 {
                        let px = src.get(si, sj);
                        acc[0] += px[0];
                        acc[1] += px[1];
                        acc[2] += px[2];
                        count += 1;
                    }
                }

                if count > 0 {
                    let n = count as f32;
                    half.set(i, j, [acc[0] / n, acc[1] / n, acc[2] / n]);
                    half_mask[[i, j]] = 1;
                }
            }
        }

        colors.push(half);
        masks.push(half_mask);

        if half_h < 2 || half_w < 2 {
            break;
        }
    }

    // Coarse to fine: invalid pixels inherit the co-located coarser color.
    for level in (0..colors.len() - 1).rev() {
        let (fine_colors, coarse_colors) = colors.split_at_mut(level + 1);
        let (fine_masks, coarse_masks) = masks.split_at_mut(level + 1);
        let fine = &mut fine_colors[level];
        let fine_mask = &mut fine_masks[level];
        let coarse = &coarse_colors[0];
        let coarse_mask = &coarse_masks[0];
        let (coarse_h, coarse_w) = coarse_mask.dim();

        let (h, w) = fine_mask.dim();
        for i in 0..h {
            for j in 0..w {
                if fine_mask[[i, j]] != 0 {
                    continue;
                }
                let mi = (i / 2).min(coarse_h - 1);
                let mj = (j / 2).min(coarse_w - 1);
                fine.set(i, j, coarse.get(mi, mj));
                fine_mask[[i, j]] = coarse_mask[[mi, mj]];
            }
        }
    }

    colors.into_iter().next().unwrap()
}
