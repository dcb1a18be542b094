use approx::assert_relative_eq;

use horizon_core::compositor::laplacian::{optimal_scale, LaplacianCompositor};
use horizon_core::compositor::{AlphaCompositor, ReplaceCompositor};
use horizon_core::error::HorizonError;

mod common;
use common::{constant_color, constant_weight, full_mask};

#[test]
fn test_optimal_scale() {
    assert_eq!(optimal_scale(16, 16), 1);
    assert_eq!(optimal_scale(64, 128), 3);
    assert_eq!(optimal_scale(128, 64), 3);
    assert_eq!(optimal_scale(8, 8), 0);
    assert_eq!(optimal_scale(7, 100), 0);
    assert_eq!(optimal_scale(1024, 2048), 7);
}

#[test]
fn test_single_view_identity() {
    let mut compositor = LaplacianCompositor::new(16, 16, 1);
    compositor
        .append(
            constant_color(16, 16, [0.5, 0.5, 0.5]),
            full_mask(16, 16),
            constant_weight(16, 16, 1.0),
            0,
            0,
        )
        .unwrap();
    assert_eq!(compositor.bands(), 1);

    let panorama = compositor.finish();
    for i in 0..16 {
        for j in 0..16 {
            for c in panorama.color.get(i, j) {
                assert!((c - 0.5).abs() < 1e-4);
            }
            assert_eq!(panorama.alpha[[i, j]], 1.0);
        }
    }
}

#[test]
fn test_two_views_hard_seam_blend() {
    // Red view owns the left half, green view the right half; hard seam
    // weights partition the panorama. Both views are 64x128 so three
    // bands engage (and the pyramid grows from its single-band seed).
    let mut compositor = LaplacianCompositor::new(128, 128, 1);

    compositor
        .append(
            constant_color(128, 64, [1.0, 0.0, 0.0]),
            full_mask(128, 64),
            constant_weight(128, 64, 1.0),
            0,
            0,
        )
        .unwrap();
    assert_eq!(compositor.bands(), 3);

    compositor
        .append(
            constant_color(128, 64, [0.0, 1.0, 0.0]),
            full_mask(128, 64),
            constant_weight(128, 64, 1.0),
            64,
            0,
        )
        .unwrap();

    let panorama = compositor.finish();

    // Every panorama pixel is claimed by exactly one view at band zero.
    for i in 0..128 {
        for j in 0..128 {
            assert_eq!(panorama.alpha[[i, j]], 1.0, "pixel ({i},{j})");
        }
    }

    let row = 64;
    // Deep inside each side the other view's contribution has died off.
    let left = panorama.color.get(row, 32);
    assert!(left[0] > 0.9 && left[1] < 0.1, "left {left:?}");
    let right = panorama.color.get(row, 96);
    assert!(right[1] > 0.9 && right[0] < 0.1, "right {right:?}");

    // Monotone transition across the seam at column 64.
    for j in 40..88 {
        let a = panorama.color.get(row, j);
        let b = panorama.color.get(row, j + 1);
        assert!(b[0] <= a[0] + 1e-3, "red not decreasing at column {j}");
        assert!(b[1] >= a[1] - 1e-3, "green not increasing at column {j}");
    }
}

#[test]
fn test_append_grows_then_rejects_shrinking() {
    let mut compositor = LaplacianCompositor::new(64, 64, 1);

    // A small view is fine while the pyramid is shallow.
    compositor
        .append(
            constant_color(16, 16, [0.5, 0.5, 0.5]),
            full_mask(16, 16),
            constant_weight(16, 16, 1.0),
            24,
            24,
        )
        .unwrap();
    assert_eq!(compositor.bands(), 1);

    // A large view grows the pyramid.
    compositor
        .append(
            constant_color(64, 64, [0.25, 0.25, 0.25]),
            full_mask(64, 64),
            constant_weight(64, 64, 1.0),
            0,
            0,
        )
        .unwrap();
    assert_eq!(compositor.bands(), 3);

    // Another small view would need fewer bands than are active.
    let result = compositor.append(
        constant_color(16, 16, [0.1, 0.1, 0.1]),
        full_mask(16, 16),
        constant_weight(16, 16, 1.0),
        0,
        0,
    );
    assert!(matches!(
        result,
        Err(HorizonError::DegenerateScale {
            optimal: 1,
            current: 3
        })
    ));
}

#[test]
fn test_augment_mid_run_keeps_both_views() {
    let mut compositor = LaplacianCompositor::new(64, 64, 1);
    compositor
        .append(
            constant_color(16, 16, [0.9, 0.9, 0.9]),
            full_mask(16, 16),
            constant_weight(16, 16, 1.0),
            24,
            24,
        )
        .unwrap();
    compositor
        .append(
            constant_color(64, 64, [0.25, 0.25, 0.25]),
            full_mask(64, 64),
            constant_weight(64, 64, 1.0),
            0,
            0,
        )
        .unwrap();

    let panorama = compositor.finish();

    // Fully covered by the second view.
    for i in 0..64 {
        for j in 0..64 {
            assert_eq!(panorama.alpha[[i, j]], 1.0);
        }
    }

    // Away from the inset only the base color remains.
    let far = panorama.color.get(4, 4);
    assert!((far[0] - 0.25).abs() < 5e-3, "far {far:?}");

    // Inside the overlap both contributions matter.
    let mid = panorama.color.get(31, 31);
    assert!(mid[0] > 0.25 && mid[0] < 0.9 + 1e-3, "mid {mid:?}");
}

#[test]
fn test_hdr_round_trip() {
    let mut compositor = LaplacianCompositor::new(64, 64, 1);
    compositor
        .append(
            constant_color(64, 64, [0.01, 1.0, 100.0]),
            full_mask(64, 64),
            constant_weight(64, 64, 1.0),
            0,
            0,
        )
        .unwrap();

    let panorama = compositor.finish();
    for (i, j) in [(0, 0), (16, 40), (32, 32), (63, 63)] {
        let px = panorama.color.get(i, j);
        assert_relative_eq!(px[0], 0.01, max_relative = 0.05);
        assert_relative_eq!(px[1], 1.0, max_relative = 0.05);
        assert_relative_eq!(px[2], 100.0, max_relative = 0.05);
    }
}

#[test]
fn test_replace_overflow_dropped() {
    let mut compositor = ReplaceCompositor::new(16, 16);
    compositor.append(
        &constant_color(8, 8, [0.7, 0.7, 0.7]),
        &full_mask(8, 8),
        4,
        12,
    );

    let panorama = compositor.finish();
    for j in 4..12 {
        assert_eq!(panorama.alpha[[12, j]], 1.0);
        assert_eq!(panorama.alpha[[15, j]], 1.0);
        assert_eq!(panorama.alpha[[11, j]], 0.0);
        assert_eq!(panorama.color.get(15, j), [0.7, 0.7, 0.7]);
    }
}

#[test]
fn test_replace_wraps_horizontally() {
    let mut compositor = ReplaceCompositor::new(16, 16);
    compositor.append(
        &constant_color(4, 8, [0.3, 0.5, 0.7]),
        &full_mask(4, 8),
        12,
        0,
    );

    let panorama = compositor.finish();
    for i in 0..4 {
        for j in [12, 15, 0, 3] {
            assert_eq!(panorama.color.get(i, j), [0.3, 0.5, 0.7]);
            assert_eq!(panorama.alpha[[i, j]], 1.0);
        }
        assert_eq!(panorama.alpha[[i, 7]], 0.0);
    }
}

#[test]
fn test_alpha_weighted_average() {
    let mut compositor = AlphaCompositor::new(8, 8);
    compositor.append(
        &constant_color(8, 8, [1.0, 0.0, 0.0]),
        &full_mask(8, 8),
        &constant_weight(8, 8, 3.0),
        0,
        0,
    );
    compositor.append(
        &constant_color(8, 8, [0.0, 1.0, 0.0]),
        &full_mask(8, 8),
        &constant_weight(8, 8, 1.0),
        0,
        0,
    );

    let panorama = compositor.finish();
    for i in 0..8 {
        for j in 0..8 {
            let px = panorama.color.get(i, j);
            assert!((px[0] - 0.75).abs() < 1e-6);
            assert!((px[1] - 0.25).abs() < 1e-6);
            assert_eq!(panorama.alpha[[i, j]], 1.0);
        }
    }
}

#[test]
fn test_alpha_uncovered_pixels_transparent() {
    let mut compositor = AlphaCompositor::new(8, 8);
    compositor.append(
        &constant_color(4, 4, [1.0, 1.0, 1.0]),
        &full_mask(4, 4),
        &constant_weight(4, 4, 1.0),
        0,
        0,
    );

    let panorama = compositor.finish();
    assert_eq!(panorama.alpha[[0, 0]], 1.0);
    assert_eq!(panorama.alpha[[6, 6]], 0.0);
    assert_eq!(panorama.color.get(6, 6), [0.0, 0.0, 0.0]);
}

#[test]
fn test_wrap_invariance_under_global_shift() {
    let pano_w = 16;
    let shift = 5;

    let build = |delta: usize| {
        let mut compositor = AlphaCompositor::new(pano_w, 8);
        compositor.append(
            &constant_color(8, 8, [1.0, 0.2, 0.2]),
            &full_mask(8, 8),
            &constant_weight(8, 8, 1.0),
            (2 + delta) % pano_w,
            0,
        );
        compositor.append(
            &constant_color(8, 8, [0.2, 1.0, 0.2]),
            &full_mask(8, 8),
            &constant_weight(8, 8, 2.0),
            (9 + delta) % pano_w,
            0,
        );
        compositor.finish()
    };

    let base = build(0);
    let shifted = build(shift);

    for i in 0..8 {
        for j in 0..pano_w {
            let a = base.color.get(i, j);
            let b = shifted.color.get(i, (j + shift) % pano_w);
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-6);
            }
            assert_eq!(base.alpha[[i, j]], shifted.alpha[[i, (j + shift) % pano_w]]);
        }
    }
}

#[test]
fn test_compositor_size_mismatch_rejected() {
    let mut compositor = LaplacianCompositor::new(16, 16, 1);
    let result = compositor.append(
        constant_color(16, 16, [0.5, 0.5, 0.5]),
        full_mask(16, 15),
        constant_weight(16, 16, 1.0),
        0,
        0,
    );
    assert!(matches!(result, Err(HorizonError::SizeMismatch { .. })));
}
