use std::path::{Path, PathBuf};

use crate::error::SqltidyError;
use crate::mode::Mode;

const KNOWN_KEYS: &[&str] = &["indent_width", "exclude"];

/// Load configuration for the given input paths. An explicit `config_path`
/// wins; otherwise parent directories of the inputs are searched for a
/// `sqltidy.toml` or a `pyproject.toml` with a `[tool.sqltidy]` table.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqltidyError> {
    let config_file = match config_path {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(SqltidyError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        None => find_config_file(files),
    };

    let mut mode = Mode::default();
    if let Some(path) = config_file {
        apply_config(&mut mode, &path)?;
    }
    Ok(mode)
}

/// Walk up from each input path looking for a config file; nearer
/// directories win.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    let mut seen = Vec::new();
    for file in files {
        let start = if file.is_dir() {
            file.as_path()
        } else {
            file.parent().unwrap_or(Path::new("."))
        };
        let mut current = Some(start);
        while let Some(dir) = current {
            if !seen.contains(&dir.to_path_buf()) {
                for name in ["sqltidy.toml", "pyproject.toml"] {
                    let candidate = dir.join(name);
                    if candidate.exists() {
                        return Some(candidate);
                    }
                }
                seen.push(dir.to_path_buf());
            }
            current = dir.parent();
        }
    }
    None
}

fn apply_config(mode: &mut Mode, path: &Path) -> Result<(), SqltidyError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Value = content
        .parse()
        .map_err(|e| SqltidyError::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    let is_own_file = path
        .file_name()
        .map(|n| n == "sqltidy.toml")
        .unwrap_or(false);

    let section = if is_own_file {
        Some(&parsed)
    } else {
        parsed.get("tool").and_then(|t| t.get("sqltidy"))
    };

    let Some(toml::Value::Table(table)) = section else {
        return Ok(());
    };

    for (key, value) in table {
        match (key.as_str(), value) {
            ("indent_width", toml::Value::Integer(n)) if *n > 0 => {
                mode.indent_width = *n as usize;
            }
            ("exclude", toml::Value::Array(arr)) => {
                mode.exclude = arr
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect();
            }
            (key, _) if KNOWN_KEYS.contains(&key) => {
                return Err(SqltidyError::Config(format!(
                    "invalid value for config option: {}",
                    key
                )));
            }
            (key, _) => {
                return Err(SqltidyError::Config(format!(
                    "unknown config option: {}",
                    key
                )));
            }
        }
    }
    Ok(())
}
