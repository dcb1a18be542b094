use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compositor::laplacian::optimal_scale;
use crate::compositor::{Compositor, CompositorKind};
use crate::error::{HorizonError, Result};
use crate::image::Panorama;
use crate::io::exr_io::{self, ExrHeader};
use crate::overlay;
use crate::scene::SceneManifest;
use crate::seams::{seam_mask_for_view, SeamLabeler};

/// Diagnostic overlay drawn on top of the composited panorama.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverlayKind {
    #[default]
    None,
    /// Red outline of every view's valid region.
    Borders,
    /// Red polylines where seam-label ownership changes.
    Seams,
}

/// Driver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComposeConfig {
    pub compositor: CompositorKind,
    #[serde(default)]
    pub overlay: OverlayKind,
    /// Band count the Laplacian pyramid starts from; grown on demand.
    pub initial_bands: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            compositor: CompositorKind::default(),
            overlay: OverlayKind::default(),
            initial_bands: 1,
        }
    }
}

/// Stages reported through the progress callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposeStage {
    SeamLabels,
    Compositing,
    Overlay,
}

fn color_path(folder: &Path, view_id: u32) -> PathBuf {
    folder.join(format!("{view_id}.exr"))
}

fn mask_path(folder: &Path, view_id: u32) -> PathBuf {
    folder.join(format!("{view_id}_mask.exr"))
}

fn weight_path(folder: &Path, view_id: u32) -> PathBuf {
    folder.join(format!("{view_id}_weight.exr"))
}

/// Composite every reconstructed view of the scene into one panorama.
///
/// Multi-band runs two passes: the first builds the seam-label map and
/// orders views by ascending optimal scale so pyramid growth happens
/// monotonically; the second feeds each view, with its hard seam weights,
/// through the compositor. The returned header carries the first
/// composited view's attributes with the warping placement keys stripped.
pub fn compose_panorama(
    scene: &SceneManifest,
    warping_folder: &Path,
    config: &ComposeConfig,
    mut progress: impl FnMut(ComposeStage, usize, usize),
) -> Result<(Panorama, ExrHeader)> {
    let first = scene
        .reconstructed_views()
        .next()
        .ok_or(HorizonError::EmptyScene)?;

    // Panorama dimensions come from the warping metadata of any view.
    let first_path = color_path(warping_folder, first.view_id);
    let (_, _, first_header) = exr_io::read_header(&first_path)?;
    let (pano_w, pano_h) = first_header.panorama_size(&first_path)?;
    if pano_w == 0 || pano_h == 0 {
        return Err(HorizonError::InvalidPanoramaSize {
            width: pano_w,
            height: pano_h,
        });
    }
    info!(width = pano_w, height = pano_h, "Panorama size");

    let multiband = config.compositor == CompositorKind::Multiband;
    let mut compositor = Compositor::new(config.compositor, pano_w, pano_h, config.initial_bands);

    // Pass 1: seam labels plus the processing order.
    let ordered: Vec<u32>;
    let mut labels: Option<Array2<u32>> = None;
    if multiband {
        let total = scene.reconstructed_views().count();
        let mut labeler = SeamLabeler::new(pano_w, pano_h);
        let mut by_scale: BTreeMap<usize, Vec<u32>> = BTreeMap::new();

        for (done, view) in scene.reconstructed_views().enumerate() {
            let mpath = mask_path(warping_folder, view.view_id);
            debug!(path = %mpath.display(), "Loading mask");
            let (mask, mask_header) = exr_io::read_mask_exr(&mpath)?;
            let (ox, oy) = mask_header.offsets(&mpath)?;

            let wpath = weight_path(warping_folder, view.view_id);
            debug!(path = %wpath.display(), "Loading weights");
            let (weight, _) = exr_io::read_weight_exr(&wpath)?;

            labeler.append(&mask, &weight, view.view_id, ox, oy)?;

            let (mh, mw) = mask.dim();
            by_scale
                .entry(optimal_scale(mw, mh))
                .or_default()
                .push(view.view_id);
            progress(ComposeStage::SeamLabels, done + 1, total);
        }

        ordered = by_scale.into_values().flatten().collect();
        labels = Some(labeler.into_labels());
    } else {
        ordered = scene.reconstructed_views().map(|v| v.view_id).collect();
    }

    // Pass 2: compositing.
    let total = ordered.len();
    let mut output_header: Option<ExrHeader> = None;
    for (done, view_id) in ordered.iter().copied().enumerate() {
        let cpath = color_path(warping_folder, view_id);
        info!(path = %cpath.display(), "Compositing view");
        let (color, color_header) = exr_io::read_color_exr(&cpath)?;
        let (ox, oy) = color_header.offsets(&cpath)?;
        if output_header.is_none() {
            output_header = Some(color_header);
        }

        let (mask, _) = exr_io::read_mask_exr(&mask_path(warping_folder, view_id))?;
        let (weight, _) = exr_io::read_weight_exr(&weight_path(warping_folder, view_id))?;

        // Multi-band gets the hard ownership map instead of soft weights.
        let weight = match &labels {
            Some(labels) => {
                let (h, w) = weight.dim();
                seam_mask_for_view(labels, view_id, w, h, ox, oy)
            }
            None => weight,
        };

        compositor.append(color, mask, weight, ox, oy)?;
        progress(ComposeStage::Compositing, done + 1, total);
    }

    let mut panorama = compositor.finish();

    match config.overlay {
        OverlayKind::None => {}
        OverlayKind::Borders => {
            let total = scene.reconstructed_views().count();
            for (done, view) in scene.reconstructed_views().enumerate() {
                let mpath = mask_path(warping_folder, view.view_id);
                let (mask, mask_header) = exr_io::read_mask_exr(&mpath)?;
                let (ox, oy) = mask_header.offsets(&mpath)?;
                overlay::draw_borders(&mut panorama, &mask, ox, oy);
                progress(ComposeStage::Overlay, done + 1, total);
            }
        }
        OverlayKind::Seams => {
            if let Some(labels) = &labels {
                overlay::draw_seams(&mut panorama, labels);
            }
            progress(ComposeStage::Overlay, 1, 1);
        }
    }

    let mut header = output_header.unwrap_or_default();
    header.strip_warping_keys();
    Ok((panorama, header))
}
