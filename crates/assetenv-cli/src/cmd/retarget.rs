use crate::output::{print_json, print_table};
use anyhow::Context;
use assetenv_core::html::HtmlDocument;
use assetenv_core::io::atomic_write;
use assetenv_core::retarget::Retargeter;
use std::path::{Path, PathBuf};

pub fn run(
    config_path: &Path,
    state_dir: &Path,
    url: &str,
    files: &[PathBuf],
    out_dir: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let (cfg, resolution) = super::resolve_for(config_path, state_dir, url)?;

    if !resolution.is_overriding() && !json {
        println!(
            "Target matches the current environment ({}); nothing to rewrite.",
            resolution.current
        );
    }

    let mut rows = Vec::new();
    let mut items = Vec::new();
    for file in files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let mut doc = HtmlDocument::parse(&text);

        // One retargeter per document: the rewrite fires once per page view
        let mut retargeter = Retargeter::new(&cfg, resolution.clone());
        let report = retargeter.run(&mut doc).unwrap_or_default();

        let dest = match out_dir {
            Some(dir) => {
                let name = file
                    .file_name()
                    .with_context(|| format!("{} has no file name", file.display()))?;
                dir.join(name)
            }
            None => file.clone(),
        };
        if report.replaced > 0 || report.banner_injected || out_dir.is_some() {
            atomic_write(&dest, doc.render().as_bytes())
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }

        if json {
            items.push(serde_json::json!({
                "file": file.display().to_string(),
                "dest": dest.display().to_string(),
                "replaced": report.replaced,
                "video_reloads": report.video_reloads,
                "banner": report.banner_injected,
            }));
        } else {
            rows.push(vec![
                file.display().to_string(),
                report.replaced.to_string(),
                if report.banner_injected { "yes" } else { "no" }.to_string(),
            ]);
        }
    }

    if json {
        print_json(&serde_json::json!({
            "target_base_url": resolution.target.base_url,
            "overriding": resolution.is_overriding(),
            "files": items,
        }))?;
    } else {
        print_table(&["FILE", "REPLACED", "BANNER"], rows);
    }

    Ok(())
}
