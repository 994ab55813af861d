//! Engine configuration: `page_width`, `indent`, `is_compilation_unit`.
//! Loadable from a TOML file much like an editor loads its own config -
//! unknown fields are ignored, a missing or unparsable file silently
//! falls back to defaults rather than erroring, since programmer
//! errors are scoped to the visitor contract, not the surrounding
//! config shell.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigFile {
    #[serde(default = "ConfigFile::default_page_width")]
    pub page_width: usize,
    #[serde(default)]
    pub indent: usize,
}

impl ConfigFile {
    const fn default_page_width() -> usize {
        80
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            page_width: Self::default_page_width(),
            indent: 0,
        }
    }
}

/// Recognized engine options.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub page_width: usize,
    pub indent: usize,
    pub is_compilation_unit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_width: 80,
            indent: 0,
            is_compilation_unit: true,
        }
    }
}

impl Config {
    pub fn new(page_width: usize, indent: usize, is_compilation_unit: bool) -> Self {
        Self {
            page_width,
            indent,
            is_compilation_unit,
        }
    }

    fn from_file(file: ConfigFile, is_compilation_unit: bool) -> Self {
        Self {
            page_width: file.page_width,
            indent: file.indent,
            is_compilation_unit,
        }
    }
}

/// Best-effort config path: a local `layoutfmt.toml` takes priority
/// over the platform config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("layoutfmt.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("layoutfmt").join("layoutfmt.toml");
    }
    PathBuf::from("layoutfmt.toml")
}

pub fn load_from(path: Option<PathBuf>, is_compilation_unit: bool) -> Config {
    let path = path.unwrap_or_else(discover);
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Config::from_file(file, is_compilation_unit),
            Err(e) => {
                tracing::warn!(
                    target: "config",
                    error = %e,
                    path = %path.display(),
                    "config_parse_failed_using_defaults"
                );
                Config {
                    is_compilation_unit,
                    ..Config::default()
                }
            }
        },
        Err(_) => Config {
            is_compilation_unit,
            ..Config::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml")), true);
        assert_eq!(cfg.page_width, 80);
        assert_eq!(cfg.indent, 0);
    }

    #[test]
    fn parses_page_width_and_indent() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "page_width = 100\nindent = 4\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()), false);
        assert_eq!(cfg.page_width, 100);
        assert_eq!(cfg.indent, 4);
        assert!(!cfg.is_compilation_unit);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "page_width = \"not a number\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()), true);
        assert_eq!(cfg.page_width, 80);
    }
}
