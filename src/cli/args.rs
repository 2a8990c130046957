use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetcut")]
#[command(version, about = "Cut sprite sheets into transparent sprites", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Cut sheets into sprites and write them as PNG files
    Cut(CutArgs),
    /// Report the detected grid of each sheet without writing anything
    Detect(DetectArgs),
    /// Write a config file with default settings
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CutArgs {
    /// Input sheets (image files or directories of images)
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a sheetcut JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory; each sheet gets a subdirectory [default: output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Square output size in pixels, 0 keeps the cropped size [default: 512]
    #[arg(short, long, value_name = "PIXELS")]
    pub size: Option<u32>,

    /// Transparent padding around each cropped sprite [default: 10]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Channel value at or above which a pixel counts as background [default: 230]
    #[arg(long, value_name = "0-255")]
    pub white_threshold: Option<u8>,

    /// Allowed distance from pure white while flood filling [default: 25]
    #[arg(long, value_name = "0-255")]
    pub flood_tolerance: Option<u8>,

    /// Resize filter algorithm [default: lanczos3]
    #[arg(long, value_enum)]
    pub resize_filter: Option<ResizeFilter>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Write a sprites.json placement manifest per sheet
    #[arg(long)]
    pub manifest: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    /// Input sheets (image files or directories of images)
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a sheetcut JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Channel value at or above which a pixel counts as background [default: 230]
    #[arg(long, value_name = "0-255")]
    pub white_threshold: Option<u8>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the config file
    pub path: PathBuf,

    /// Input sheets to record in the config (stored relative to it)
    pub input: Vec<PathBuf>,

    /// Output directory to record in the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resize filter algorithm
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Hash)]
pub enum ResizeFilter {
    /// Nearest neighbor (best for pixel art)
    #[value(name = "nearest")]
    Nearest,
    /// Bilinear interpolation
    #[value(name = "triangle")]
    Triangle,
    /// Cubic interpolation (bicubic)
    #[value(name = "catmull-rom", alias = "bicubic")]
    CatmullRom,
    /// Gaussian filter
    #[value(name = "gaussian")]
    Gaussian,
    /// Lanczos with window 3 (highest quality)
    #[default]
    #[value(name = "lanczos3")]
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Gaussian => image::imageops::FilterType::Gaussian,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }

    /// Name as accepted on the command line and in config files
    pub fn name(self) -> &'static str {
        match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmull-rom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            return Ok(CompressionLevel::Max);
        }
        let n = s
            .parse::<u8>()
            .map_err(|_e| format!("invalid compression level: {}", s))?;
        if n <= 6 {
            Ok(CompressionLevel::Level(n))
        } else {
            Err(format!("compression level must be 0-6 or 'max', got {}", n))
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
