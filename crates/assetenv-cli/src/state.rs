use std::path::{Path, PathBuf};

/// Resolve the hosts config path.
///
/// Priority:
/// 1. `--config` flag / `ASSETENV_CONFIG` env var (passed in as `explicit`)
/// 2. `assetenv.yaml` in the current directory
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from("assetenv.yaml"),
    }
}

/// Resolve the directory holding the persisted override preference — the
/// cookie jar, roughly.
///
/// Priority:
/// 1. `--state-dir` flag / `ASSETENV_STATE_DIR` env var
/// 2. `~/.assetenv`
/// 3. `.assetenv` in the current directory when no home is known
pub fn resolve_state_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    match home::home_dir() {
        Some(h) => h.join(".assetenv"),
        None => PathBuf::from(".assetenv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_config_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        assert_eq!(resolve_config_path(Some(&path)), path);
    }

    #[test]
    fn default_config_is_cwd_relative() {
        assert_eq!(resolve_config_path(None), PathBuf::from("assetenv.yaml"));
    }

    #[test]
    fn explicit_state_dir_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_state_dir(Some(dir.path())), dir.path());
    }
}
