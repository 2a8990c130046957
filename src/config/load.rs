use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::cut::CutConfig;
use super::types::SheetcutConfig;

/// A parsed config file plus the directory its relative paths hang off.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SheetcutConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SheetcutConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version != 1 {
            return Err(anyhow!(
                "unsupported config version {} in {}",
                config.version,
                path.display()
            ));
        }

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Expand the `input` entries into paths.
    ///
    /// Glob patterns are expanded in the order `glob` yields them (sorted);
    /// plain entries are passed through. Everything is joined onto the
    /// config directory.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            if !is_glob_pattern(pattern) {
                results.push(self.config_dir.join(pattern));
                continue;
            }

            let full_pattern = self.config_dir.join(pattern);
            let matches = glob::glob(&full_pattern.to_string_lossy())
                .with_context(|| format!("invalid glob pattern: {}", pattern))?;

            for entry in matches {
                results.push(
                    entry.with_context(|| format!("failed to read glob entry: {}", pattern))?,
                );
            }
        }

        Ok(results)
    }

    /// Output directory, relative to the config file directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }

    /// Pipeline settings described by the file, without any CLI overrides.
    pub fn cut_config(&self) -> Result<CutConfig> {
        let filter = self.config.parse_resize_filter().ok_or_else(|| {
            anyhow!(
                "unknown resize_filter '{}' in config file. Valid values: nearest, triangle, \
                 catmull-rom, gaussian, lanczos3",
                self.config.resize_filter
            )
        })?;

        Ok(CutConfig::default()
            .target_size(self.config.target_size)
            .padding(self.config.padding)
            .white_threshold(self.config.white_threshold)
            .flood_tolerance(self.config.flood_tolerance)
            .resize_filter(filter)
            .grid(self.config.grid))
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}
