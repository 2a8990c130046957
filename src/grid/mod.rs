mod detector;
mod layout;
mod rect;
mod splitter;

pub use detector::detect;
pub use layout::{Band, GridLayout};
pub use rect::Rect;
pub use splitter::{Cell, split};
