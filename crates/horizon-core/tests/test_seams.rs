use ndarray::Array2;

use horizon_core::image::NO_LABEL;
use horizon_core::seams::{seam_mask_for_view, SeamLabeler};

mod common;
use common::{constant_weight, full_mask};

#[test]
fn test_highest_weight_wins() {
    let mut labeler = SeamLabeler::new(8, 8);
    labeler
        .append(&full_mask(8, 8), &constant_weight(8, 8, 0.5), 1, 0, 0)
        .unwrap();
    labeler
        .append(&full_mask(8, 8), &constant_weight(8, 8, 0.8), 2, 0, 0)
        .unwrap();

    let labels = labeler.into_labels();
    assert!(labels.iter().all(|&l| l == 2));
}

#[test]
fn test_ties_keep_first_writer() {
    let mut labeler = SeamLabeler::new(8, 8);
    labeler
        .append(&full_mask(8, 8), &constant_weight(8, 8, 0.5), 7, 0, 0)
        .unwrap();
    labeler
        .append(&full_mask(8, 8), &constant_weight(8, 8, 0.5), 9, 0, 0)
        .unwrap();

    let labels = labeler.into_labels();
    assert!(labels.iter().all(|&l| l == 7));
}

#[test]
fn test_masked_pixels_do_not_claim() {
    let mut labeler = SeamLabeler::new(4, 4);
    let mut mask = full_mask(4, 4);
    mask[[2, 2]] = 0;
    labeler
        .append(&mask, &constant_weight(4, 4, 1.0), 3, 0, 0)
        .unwrap();

    let labels = labeler.into_labels();
    assert_eq!(labels[[2, 2]], NO_LABEL);
    assert_eq!(labels[[0, 0]], 3);
}

#[test]
fn test_horizontal_wrap() {
    // 4-wide view at offset 14 on a 16-wide panorama: columns 14, 15, 0, 1.
    let mut labeler = SeamLabeler::new(16, 4);
    labeler
        .append(&full_mask(4, 4), &constant_weight(4, 4, 1.0), 5, 14, 0)
        .unwrap();

    let labels = labeler.into_labels();
    for i in 0..4 {
        for j in [14, 15, 0, 1] {
            assert_eq!(labels[[i, j]], 5);
        }
        assert_eq!(labels[[i, 7]], NO_LABEL);
    }
}

#[test]
fn test_bottom_overflow_dropped() {
    let mut labeler = SeamLabeler::new(8, 8);
    labeler
        .append(&full_mask(4, 4), &constant_weight(4, 4, 1.0), 1, 0, 6)
        .unwrap();

    let labels = labeler.into_labels();
    assert_eq!(labels[[6, 0]], 1);
    assert_eq!(labels[[7, 0]], 1);
    assert_eq!(labels[[0, 0]], NO_LABEL);
}

#[test]
fn test_size_mismatch_rejected() {
    let mut labeler = SeamLabeler::new(8, 8);
    let result = labeler.append(&full_mask(4, 4), &constant_weight(4, 5, 1.0), 1, 0, 0);
    assert!(result.is_err());
}

#[test]
fn test_seam_mask_extraction_with_wrap() {
    let mut labels = Array2::from_elem((4, 16), NO_LABEL);
    for i in 0..4 {
        for j in [14, 15, 0, 1] {
            labels[[i, j]] = 5;
        }
    }

    let seam = seam_mask_for_view(&labels, 5, 4, 4, 14, 0);
    assert!(seam.iter().all(|&v| v == 1.0));

    let other = seam_mask_for_view(&labels, 6, 4, 4, 14, 0);
    assert!(other.iter().all(|&v| v == 0.0));
}
