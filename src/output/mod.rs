mod format;
mod json;

pub use format::{encode_png, save_sprites, sprite_filename};
pub use json::{MANIFEST_FILENAME, write_manifest};
