pub mod config;
pub mod load;
pub mod pref;
pub mod resolve;
pub mod retarget;

use anyhow::Context;
use assetenv_core::hosts::Config;
use assetenv_core::preference::PreferenceStore;
use assetenv_core::resolve::{parse_page_url, resolve_page, Resolution};
use std::path::Path;

/// Detection plus override resolution for a page URL, including the
/// preference side effect — exactly what the browser loader does before it
/// fetches anything.
pub fn resolve_for(
    config_path: &Path,
    state_dir: &Path,
    url: &str,
) -> anyhow::Result<(Config, Resolution)> {
    let cfg = Config::load_or_default(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let page = parse_page_url(url)?;
    let store = PreferenceStore::new(state_dir);
    let stored = store.get().context("failed to read override preference")?;
    let resolution = resolve_page(&cfg, &page, stored)?;
    store
        .apply(resolution.directive)
        .context("failed to persist override preference")?;
    Ok((cfg, resolution))
}
