pub mod background;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod output;
pub mod pipeline;
pub mod sprite;

#[cfg(test)]
mod fixtures;

pub use background::{AlphaMask, remove_background};
pub use cli::{CliArgs, Command, CutArgs, DetectArgs, InitArgs, ResizeFilter};
pub use config::{CutConfig, GridTuning};
pub use error::SheetcutError;
pub use grid::{Band, Cell, GridLayout, Rect, detect, split};
pub use pipeline::{CutSheet, SheetOutcome, cut_sheet, process, process_batch};
pub use sprite::{PixelBuffer, Placement, SourceSheet, Sprite, crop_and_resize};
