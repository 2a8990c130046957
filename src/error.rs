use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetcutError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Invalid pixel buffer: {width}x{height} (width and height must be positive)")]
    InvalidBuffer { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
