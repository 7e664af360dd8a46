use crate::error::{AssetEnvError, Result};
use crate::io;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// HostsConfig
// ---------------------------------------------------------------------------

/// The deployment hosts this site knows about. Hostname matches are exact
/// (including the port, when the page URL carries one) except for the
/// pull-request pattern, whose first capture group is the numeric PR id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostsConfig {
    #[serde(default = "default_production_host")]
    pub production: String,
    #[serde(default = "default_local_dev_host")]
    pub local_dev: String,
    #[serde(default = "default_pull_request_pattern")]
    pub pull_request_pattern: String,
    /// Base URL production pages load their assets from.
    #[serde(default = "default_production_asset_base")]
    pub production_asset_base: String,
    #[serde(default = "default_local_dev_origin")]
    pub local_dev_origin: String,
    /// Origin template for pull-request environments; `{id}` is replaced
    /// with the PR number.
    #[serde(default = "default_pull_request_origin")]
    pub pull_request_origin: String,
}

fn default_production_host() -> String {
    "www.example.com".to_string()
}

fn default_local_dev_host() -> String {
    "localhost:3902".to_string()
}

fn default_pull_request_pattern() -> String {
    r"^example-pr-(\d+)\.example\.dev$".to_string()
}

fn default_production_asset_base() -> String {
    "https://assets.example.com".to_string()
}

fn default_local_dev_origin() -> String {
    "https://localhost:3902".to_string()
}

fn default_pull_request_origin() -> String {
    "https://example-pr-{id}.example.dev".to_string()
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            production: default_production_host(),
            local_dev: default_local_dev_host(),
            pull_request_pattern: default_pull_request_pattern(),
            production_asset_base: default_production_asset_base(),
            local_dev_origin: default_local_dev_origin(),
            pull_request_origin: default_pull_request_origin(),
        }
    }
}

impl HostsConfig {
    pub fn pull_request_regex(&self) -> Result<Regex> {
        Regex::new(&self.pull_request_pattern).map_err(|source| {
            AssetEnvError::InvalidHostPattern {
                pattern: self.pull_request_pattern.clone(),
                source,
            }
        })
    }

    /// Origin for the pull-request environment of PR `id`.
    pub fn pull_request_origin_for(&self, id: u32) -> String {
        self.pull_request_origin.replace("{id}", &id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub hosts: HostsConfig,
    /// Script bundles fetched from the resolved target, in order.
    #[serde(default = "default_bundle_paths")]
    pub bundle_paths: Vec<String>,
}

fn default_version() -> u32 {
    1
}

fn default_bundle_paths() -> Vec<String> {
    vec!["/js/bundle.js".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            hosts: HostsConfig::default(),
            bundle_paths: default_bundle_paths(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AssetEnvError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in hosts.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        match self.hosts.pull_request_regex() {
            Err(e) => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("{e}"),
            }),
            Ok(re) => {
                // captures_len counts the implicit whole-match group
                if re.captures_len() < 2 {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!(
                            "pull_request_pattern '{}' has no capture group for the PR id",
                            self.hosts.pull_request_pattern
                        ),
                    });
                }
            }
        }

        if !self.hosts.pull_request_origin.contains("{id}") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "pull_request_origin '{}' is missing the {{id}} placeholder",
                    self.hosts.pull_request_origin
                ),
            });
        }

        for (name, origin) in [
            ("production_asset_base", &self.hosts.production_asset_base),
            ("local_dev_origin", &self.hosts.local_dev_origin),
            ("pull_request_origin", &self.hosts.pull_request_origin),
        ] {
            if origin.ends_with('/') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "{name} '{origin}' ends with '/': bundle paths already start with one"
                    ),
                });
            }
        }

        if self.bundle_paths.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "bundle_paths is empty: 'load' will fetch nothing".to_string(),
            });
        }
        for path in &self.bundle_paths {
            if !path.starts_with('/') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("bundle path '{path}' should start with '/'"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
