use crate::output::{print_json, print_table};
use anyhow::Context;
use assetenv_core::fetch::BundleFetcher;
use std::path::Path;

pub fn run(
    config_path: &Path,
    state_dir: &Path,
    url: &str,
    out: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let (cfg, resolution) = super::resolve_for(config_path, state_dir, url)?;

    tracing::info!(
        target_base = %resolution.target.base_url,
        bundles = cfg.bundle_paths.len(),
        "fetching bundles"
    );

    let fetcher = BundleFetcher::new()?;
    let fetched = fetcher
        .fetch_all(&resolution.target.base_url, &cfg.bundle_paths, out)
        .context("bundle fetch failed")?;

    if json {
        let items: Vec<_> = fetched
            .iter()
            .map(|b| {
                serde_json::json!({
                    "path": b.path,
                    "url": b.url,
                    "bytes": b.bytes,
                    "file": b.file.display().to_string(),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "target_base_url": resolution.target.base_url,
            "fetched": items,
        }))?;
    } else {
        println!("Target: {}", resolution.target.base_url);
        let rows = fetched
            .iter()
            .map(|b| {
                vec![
                    b.path.clone(),
                    b.bytes.to_string(),
                    b.file.display().to_string(),
                ]
            })
            .collect();
        print_table(&["PATH", "BYTES", "FILE"], rows);
    }

    Ok(())
}
