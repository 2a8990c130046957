use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, error, info};

use sheetcut::cli::{CliArgs, Command, CompressionLevel, CutArgs, DetectArgs, InitArgs};
use sheetcut::config::{
    CompressConfig, CutConfig, LoadedConfig, SheetcutConfig, make_relative, save_config,
};
use sheetcut::output::{save_sprites, write_manifest};
use sheetcut::pipeline::process_batch;
use sheetcut::sprite::{SourceSheet, load_sheets};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // The logger may not be initialized yet (e.g. a bad config file)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match &cli.command {
        Command::Cut(args) => cut(args),
        Command::Detect(args) => detect(args),
        Command::Init(args) => init(args),
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Settings for a `cut` run after merging CLI flags over the config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    cut: CutConfig,
    compress: Option<CompressionLevel>,
    manifest: bool,
}

fn cut(args: &CutArgs) -> Result<()> {
    let merged = merge_config_with_args(args)?;
    init_logging(args.verbose);

    info!("sheetcut v{}", env!("CARGO_PKG_VERSION"));
    debug!("{:?}", merged.cut);

    let (sheets, mut failures) = load_all(&merged.input)?;
    let total_sheets = sheets.len() + failures;

    let mut sprite_count = 0;
    for outcome in process_batch(&sheets, &merged.cut) {
        let sheet = outcome.sheet;
        let written = outcome
            .result
            .map_err(anyhow::Error::from)
            .and_then(|cut| {
                let sheet_dir = merged.output.join(&sheet.name);
                let paths = save_sprites(&cut.sprites, &sheet_dir, merged.compress)?;
                if merged.manifest {
                    let size = (sheet.buffer.width(), sheet.buffer.height());
                    write_manifest(&cut, &sheet.name, size, &sheet_dir)?;
                }
                Ok((sheet_dir, paths.len()))
            });

        match written {
            Ok((sheet_dir, count)) => {
                info!(
                    "{}: {} sprite(s) -> {}",
                    sheet.path.display(),
                    count,
                    sheet_dir.display()
                );
                sprite_count += count;
            }
            Err(e) => {
                error!("{}: {:#}", sheet.path.display(), e);
                failures += 1;
            }
        }
    }

    info!(
        "{} sprite(s) extracted to {}",
        sprite_count,
        merged.output.display()
    );

    if failures > 0 {
        return Err(anyhow!("{} of {} sheet(s) failed", failures, total_sheets));
    }
    Ok(())
}

/// Decode every input, logging the ones that fail.
fn load_all(inputs: &[PathBuf]) -> Result<(Vec<SourceSheet>, usize)> {
    let mut sheets = Vec::new();
    let mut failures = 0;

    for loaded in load_sheets(inputs)? {
        match loaded {
            Ok(sheet) => sheets.push(sheet),
            Err(e) => {
                error!("{:#}", e);
                failures += 1;
            }
        }
    }

    Ok((sheets, failures))
}

fn detect(args: &DetectArgs) -> Result<()> {
    let loaded = load_config(args.config.as_deref())?;
    let input = resolve_input(&args.input, loaded.as_ref())?;
    let mut config = base_cut_config(loaded.as_ref())?;
    if let Some(threshold) = args.white_threshold {
        config.white_threshold = threshold;
    }
    config.validate()?;

    init_logging(args.verbose);

    let (sheets, mut failures) = load_all(&input)?;
    for sheet in &sheets {
        if sheet.buffer.is_empty() {
            error!("{}: image has no pixels", sheet.path.display());
            failures += 1;
            continue;
        }
        let layout = sheetcut::detect(&sheet.buffer, &config);
        info!(
            "{}: {}x{} grid ({} cell(s))",
            sheet.path.display(),
            layout.row_count(),
            layout.column_count(),
            layout.cell_count()
        );
        debug!("rows {:?}, columns {:?}", layout.rows, layout.columns);
    }

    if failures > 0 {
        return Err(anyhow!("{} sheet(s) could not be read", failures));
    }
    Ok(())
}

fn init(args: &InitArgs) -> Result<()> {
    init_logging(false);

    if args.path.exists() {
        return Err(anyhow!("{} already exists", args.path.display()));
    }

    let config_path = std::path::absolute(&args.path)
        .with_context(|| format!("invalid config path: {}", args.path.display()))?;
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let relative = |path: &Path| -> Result<String> {
        let absolute = std::path::absolute(path)
            .with_context(|| format!("invalid path: {}", path.display()))?;
        Ok(make_relative(&absolute, &base))
    };

    let defaults = SheetcutConfig::default();
    let input = args
        .input
        .iter()
        .map(|p| relative(p))
        .collect::<Result<Vec<_>>>()?;
    let output_dir = match &args.output {
        Some(output) => relative(output)?,
        None => defaults.output_dir.clone(),
    };
    let config = SheetcutConfig {
        input,
        output_dir,
        ..defaults
    };

    save_config(&config, &config_path)?;
    info!("Wrote {}", args.path.display());

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Option<LoadedConfig>> {
    path.map(|p| {
        LoadedConfig::load(p).with_context(|| format!("failed to load config: {}", p.display()))
    })
    .transpose()
}

/// Input sheets: CLI arguments override the config file.
fn resolve_input(cli_input: &[PathBuf], loaded: Option<&LoadedConfig>) -> Result<Vec<PathBuf>> {
    if !cli_input.is_empty() {
        return Ok(cli_input.to_vec());
    }
    match loaded {
        Some(lc) => lc
            .resolve_inputs()
            .context("failed to resolve input files from config"),
        // clap's required_unless_present rules this out
        None => Ok(Vec::new()),
    }
}

fn base_cut_config(loaded: Option<&LoadedConfig>) -> Result<CutConfig> {
    match loaded {
        Some(lc) => lc.cut_config(),
        None => Ok(CutConfig::default()),
    }
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CutArgs) -> Result<MergedConfig> {
    let loaded = load_config(args.config.as_deref())?;
    let input = resolve_input(&args.input, loaded.as_ref())?;

    // Output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("output"))
    });

    let mut cut = base_cut_config(loaded.as_ref())?;
    if let Some(size) = args.size {
        cut.target_size = size;
    }
    if let Some(padding) = args.padding {
        cut.padding = padding;
    }
    if let Some(threshold) = args.white_threshold {
        cut.white_threshold = threshold;
    }
    if let Some(tolerance) = args.flood_tolerance {
        cut.flood_tolerance = tolerance;
    }
    if let Some(filter) = args.resize_filter {
        cut.resize_filter = filter;
    }
    cut.validate()?;

    // Compress: CLI option overrides config
    let compress = match (args.compress, loaded.as_ref()) {
        (Some(level), _) => Some(level),
        (None, Some(lc)) => lc
            .config
            .compress
            .as_ref()
            .map(compression_from_config)
            .transpose()?,
        (None, None) => None,
    };

    let manifest = args.manifest || loaded.as_ref().is_some_and(|lc| lc.config.manifest);

    Ok(MergedConfig {
        input,
        output,
        cut,
        compress,
        manifest,
    })
}

fn compression_from_config(compress: &CompressConfig) -> Result<CompressionLevel> {
    let text = match compress {
        CompressConfig::Level(n) => n.to_string(),
        CompressConfig::Max(s) => s.clone(),
    };
    text.parse::<CompressionLevel>()
        .map_err(|e| anyhow!("{} in config file", e))
}
