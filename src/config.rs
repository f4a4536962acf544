use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base address of the reports backend when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// File the exporter writes when nothing is configured.
pub const DEFAULT_EXPORT_PATH: &str = "system_reports.csv";

/// Root configuration loaded from `config.toml`.
///
/// The file is optional — the dashboard is zero-config by default and
/// talks to the local backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the reports API, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Where the CSV export lands.
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_export_path() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_PATH)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: default_export_path(),
        }
    }
}

impl AppConfig {
    /// Load and parse the config file. Falls back to `./config.toml` next to
    /// the executable if no explicit path is given, and to built-in defaults
    /// if no file exists at all.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => {
                // Look next to the executable first, then CWD
                let exe_dir = std::env::current_exe()
                    .ok()
                    .and_then(|p| p.parent().map(Path::to_path_buf));

                if let Some(dir) = exe_dir {
                    let candidate = dir.join("config.toml");
                    if candidate.exists() {
                        candidate
                    } else {
                        PathBuf::from("config.toml")
                    }
                } else {
                    PathBuf::from("config.toml")
                }
            }
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read config at {}: {e}", path.display()))?;

        let config: AppConfig = toml::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_the_local_backend() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.export.path, PathBuf::from(DEFAULT_EXPORT_PATH));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load(Some("/definitely/not/here/config.toml")).unwrap();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[api]\nbase_url = \"http://10.0.0.2:8080\"").unwrap();

        let cfg = AppConfig::load(Some(f.path().to_str().unwrap())).unwrap();
        assert_eq!(cfg.api.base_url, "http://10.0.0.2:8080");
        assert_eq!(cfg.export.path, PathBuf::from(DEFAULT_EXPORT_PATH));
    }
}
