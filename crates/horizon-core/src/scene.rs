use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Minimal structure-from-motion manifest: the set of views and whether
/// each one was reconstructed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneManifest {
    pub views: Vec<ViewEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewEntry {
    pub view_id: u32,
    #[serde(default)]
    pub pose_id: Option<u32>,
    #[serde(default)]
    pub intrinsic_id: Option<u32>,
}

impl ViewEntry {
    /// A view contributes to the panorama only when both its pose and its
    /// intrinsic were estimated.
    pub fn is_reconstructed(&self) -> bool {
        self.pose_id.is_some() && self.intrinsic_id.is_some()
    }
}

impl SceneManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Views with a valid pose, in manifest order.
    pub fn reconstructed_views(&self) -> impl Iterator<Item = &ViewEntry> {
        self.views.iter().filter(|v| v.is_reconstructed())
    }
}
