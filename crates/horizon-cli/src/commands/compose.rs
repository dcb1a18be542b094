use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use horizon_core::compose::{compose_panorama, ComposeConfig, ComposeStage, OverlayKind};
use horizon_core::compositor::CompositorKind;
use horizon_core::io::exr_io::write_panorama_exr;
use horizon_core::io::preview::save_preview_png;
use horizon_core::scene::SceneManifest;

#[derive(Clone, ValueEnum)]
pub enum CompositerArg {
    Replace,
    Alpha,
    Multiband,
}

#[derive(Clone, ValueEnum)]
pub enum OverlayArg {
    None,
    Borders,
    Seams,
}

#[derive(Args)]
pub struct ComposeArgs {
    /// Input scene manifest (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Folder with warped images, masks and weights
    #[arg(short, long)]
    pub warping_folder: PathBuf,

    /// Path of the output panorama (EXR)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Compositing algorithm
    #[arg(long, value_enum, default_value = "multiband")]
    pub compositer_type: CompositerArg,

    /// Diagnostic overlay drawn on the output
    #[arg(long, value_enum, default_value = "none")]
    pub overlay_type: OverlayArg,

    /// Initial number of pyramid bands (grown on demand)
    #[arg(long, default_value = "1")]
    pub bands: usize,

    /// Optional tone-mapped PNG preview
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

pub fn run(args: &ComposeArgs) -> Result<()> {
    let scene = SceneManifest::load(&args.input)?;
    let total = scene.reconstructed_views().count();

    let config = ComposeConfig {
        compositor: match args.compositer_type {
            CompositerArg::Replace => CompositorKind::Replace,
            CompositerArg::Alpha => CompositorKind::Alpha,
            CompositerArg::Multiband => CompositorKind::Multiband,
        },
        overlay: match args.overlay_type {
            OverlayArg::None => OverlayKind::None,
            OverlayArg::Borders => OverlayKind::Borders,
            OverlayArg::Seams => OverlayKind::Seams,
        },
        initial_bands: args.bands,
    };

    println!(
        "Compositing {} views ({})",
        total, config.compositor
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Seam labels");

    let (panorama, header) =
        compose_panorama(&scene, &args.warping_folder, &config, |stage, done, total| {
            let msg = match stage {
                ComposeStage::SeamLabels => "Seam labels",
                ComposeStage::Compositing => "Compositing",
                ComposeStage::Overlay => "Overlay",
            };
            pb.set_message(msg);
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })?;
    pb.finish();

    write_panorama_exr(&args.output, &panorama, &header)?;
    println!(
        "Saved {}x{} panorama to {}",
        panorama.width(),
        panorama.height(),
        args.output.display()
    );

    if let Some(preview) = &args.preview {
        save_preview_png(&panorama, preview)?;
        println!("Saved preview to {}", preview.display());
    }

    Ok(())
}
