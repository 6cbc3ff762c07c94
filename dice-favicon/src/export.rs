use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::bundle::render_icon_bundle;
use crate::raster::render_raster;
use crate::vector::render_vector;

/// What gets written into an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// The 64x64 SVG document
    Vector,

    /// A square PNG of the given edge length
    Raster(u32),

    /// An ICO holding one frame per size, in order
    Bundle(&'static [u32]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub file_name: &'static str,
    pub artifact: Artifact,
}

/// Every file the favicon set consists of, in the order they are written.
pub const OUTPUTS: [Output; 7] = [
    Output {
        file_name: "favicon.svg",
        artifact: Artifact::Vector,
    },
    Output {
        file_name: "favicon-16x16.png",
        artifact: Artifact::Raster(16),
    },
    Output {
        file_name: "favicon-32x32.png",
        artifact: Artifact::Raster(32),
    },
    Output {
        file_name: "apple-touch-icon.png",
        artifact: Artifact::Raster(180),
    },
    Output {
        file_name: "android-chrome-192x192.png",
        artifact: Artifact::Raster(192),
    },
    Output {
        file_name: "android-chrome-512x512.png",
        artifact: Artifact::Raster(512),
    },
    Output {
        file_name: "favicon.ico",
        artifact: Artifact::Bundle(&[16, 32, 48]),
    },
];

impl Output {
    /// Render this output and write it into `dir`.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name);

        match self.artifact {
            Artifact::Vector => render_vector()?.write_to(&path)?,
            Artifact::Raster(size) => render_raster(size)?.write_png(&path)?,
            Artifact::Bundle(sizes) => render_icon_bundle(sizes)?.write_to(&path)?,
        }

        Ok(path)
    }
}

/// Write the whole favicon set into `dir`, calling `written` after each file.
///
/// Stops at the first failure. Files written before it are left in place.
pub fn export_all(
    dir: &Path,
    mut written: impl FnMut(&Path) -> Result<()>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut paths = Vec::with_capacity(OUTPUTS.len());
    for output in &OUTPUTS {
        let path = output.write(dir)?;
        written(&path)?;
        paths.push(path);
    }

    info!(count = paths.len(), dir = %dir.display(), "Exported favicon set");
    Ok(paths)
}
