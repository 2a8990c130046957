mod args;

pub use args::{
    CliArgs, Command, CompressionLevel, CutArgs, DetectArgs, InitArgs, ResizeFilter,
};
