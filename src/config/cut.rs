use serde::{Deserialize, Serialize};

use crate::cli::ResizeFilter;
use crate::error::SheetcutError;

/// Tunable constants of the grid detector.
///
/// The defaults match the sheets the tool was built for (1x1, 2x2, 3x2 and
/// 3x3 layouts); loosen them for unusual layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridTuning {
    /// Fraction of non-background pixels above which a row/column is a separator line
    pub separator_fraction: f32,
    /// Fraction of background pixels above which a row/column belongs to a white gap
    pub gap_fraction: f32,
    /// Minimum white-gap width as a fraction of the sheet dimension
    pub min_gap_fraction: f32,
    /// Gaps reaching into this outer fraction of the sheet are margins, not gaps
    pub edge_margin_fraction: f32,
    /// Largest allowed ratio between the biggest and smallest band on an axis
    pub balance_ratio: f32,
    /// Separator-strategy bands at or below this many pixels are folded into the separator
    pub min_band_extent: u32,
    /// Filled runs thicker than this many pixels are content, not separator lines
    pub max_separator_extent: u32,
}

impl Default for GridTuning {
    fn default() -> Self {
        Self {
            separator_fraction: 0.95,
            gap_fraction: 0.95,
            min_gap_fraction: 0.02,
            edge_margin_fraction: 0.05,
            balance_ratio: 1.6,
            min_band_extent: 10,
            max_separator_extent: 20,
        }
    }
}

/// Settings shared by every stage of the cutting pipeline.
///
/// Built once per run at the boundary (CLI or config file), validated, and
/// then only ever borrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct CutConfig {
    /// Square output size in pixels; 0 keeps the padded crop size
    pub target_size: u32,
    /// Transparent padding kept around the tight crop
    pub padding: u32,
    /// Per-channel brightness at or above which a pixel looks like background
    pub white_threshold: u8,
    /// Allowed per-channel distance from pure white while flood filling
    pub flood_tolerance: u8,
    /// Filter used when scaling to `target_size`
    pub resize_filter: ResizeFilter,
    /// Grid detection constants
    pub grid: GridTuning,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            target_size: 512,
            padding: 10,
            white_threshold: 230,
            flood_tolerance: 25,
            resize_filter: ResizeFilter::Lanczos3,
            grid: GridTuning::default(),
        }
    }
}

impl CutConfig {
    pub fn target_size(mut self, size: u32) -> Self {
        self.target_size = size;
        self
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn white_threshold(mut self, threshold: u8) -> Self {
        self.white_threshold = threshold;
        self
    }

    pub fn flood_tolerance(mut self, tolerance: u8) -> Self {
        self.flood_tolerance = tolerance;
        self
    }

    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    pub fn grid(mut self, grid: GridTuning) -> Self {
        self.grid = grid;
        self
    }

    /// Check the values the pipeline relies on.
    ///
    /// Thresholds are `u8` so their range is enforced by the type; only the
    /// floating point tuning values need checking here.
    pub fn validate(&self) -> Result<(), SheetcutError> {
        let g = &self.grid;
        let fractions = [
            ("separator_fraction", g.separator_fraction),
            ("gap_fraction", g.gap_fraction),
            ("min_gap_fraction", g.min_gap_fraction),
        ];
        for (name, value) in fractions {
            if value.is_nan() || value <= 0.0 || value > 1.0 {
                return Err(SheetcutError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(0.0..0.5).contains(&g.edge_margin_fraction) {
            return Err(SheetcutError::InvalidConfig(format!(
                "edge_margin_fraction must be in [0, 0.5), got {}",
                g.edge_margin_fraction
            )));
        }

        if g.balance_ratio.is_nan() || g.balance_ratio < 1.0 {
            return Err(SheetcutError::InvalidConfig(format!(
                "balance_ratio must be at least 1.0, got {}",
                g.balance_ratio
            )));
        }

        Ok(())
    }
}
