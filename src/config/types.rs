use serde::{Deserialize, Serialize};

use super::cut::{CutConfig, GridTuning};
use crate::cli::ResizeFilter;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Sheetcut configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetcutConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths, directories or glob patterns
    pub input: Vec<String>,
    /// Output directory; each sheet gets its own subdirectory
    pub output_dir: String,
    /// Square output size in pixels (0 keeps the cropped size)
    pub target_size: u32,
    /// Transparent padding around each cropped sprite
    pub padding: u32,
    /// Per-channel value at or above which a pixel counts as background
    pub white_threshold: u8,
    /// Allowed distance from pure white while flood filling
    pub flood_tolerance: u8,
    /// Resize filter algorithm (nearest, triangle, catmull-rom, gaussian, lanczos3)
    pub resize_filter: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Write a sprites.json placement manifest next to the sprites
    pub manifest: bool,
    /// Grid detection constants
    pub grid: GridTuning,
}

impl Default for SheetcutConfig {
    fn default() -> Self {
        let cut = CutConfig::default();
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: "output".to_string(),
            target_size: cut.target_size,
            padding: cut.padding,
            white_threshold: cut.white_threshold,
            flood_tolerance: cut.flood_tolerance,
            resize_filter: cut.resize_filter.name().to_string(),
            compress: None,
            manifest: false,
            grid: cut.grid,
        }
    }
}

impl SheetcutConfig {
    /// Parse the `resize_filter` string; `None` for unknown names.
    pub fn parse_resize_filter(&self) -> Option<ResizeFilter> {
        match self.resize_filter.as_str() {
            "nearest" => Some(ResizeFilter::Nearest),
            "triangle" => Some(ResizeFilter::Triangle),
            "catmull-rom" | "bicubic" => Some(ResizeFilter::CatmullRom),
            "gaussian" => Some(ResizeFilter::Gaussian),
            "lanczos3" => Some(ResizeFilter::Lanczos3),
            _ => None,
        }
    }
}
