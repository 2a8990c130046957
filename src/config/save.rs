use std::path::Path;

use anyhow::{Context, Result};

use super::types::SheetcutConfig;

/// Write `config` as pretty-printed JSON, creating the parent directory.
pub fn save_config(config: &SheetcutConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Express `path` relative to `base` for storing in a config file.
///
/// Paths outside `base` are stored as given.
pub fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
