mod buffer;
mod cropper;
mod loader;
mod resizer;
mod sprite;

pub use buffer::{Channels, PixelBuffer};
pub use cropper::crop_and_resize;
pub use loader::{SourceSheet, collect_sheet_paths, load_sheet, load_sheets};
pub use resizer::{fit_within, letterbox};
pub use sprite::{Placement, Sprite};
