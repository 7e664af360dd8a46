use crate::dom::Dom;
use crate::hosts::Config;
use crate::resolve::Resolution;

pub const BANNER_CLASS: &str = "dev-notice";

/// The fixed notice appended to the body when a production page is
/// overridden: full width, pinned to the bottom, stacked above page content.
pub fn banner_html(target_base_url: &str) -> String {
    format!(
        "<div class=\"{BANNER_CLASS}\" style=\"position:fixed;left:0;right:0;bottom:0;\
         background-color:rgb(243,98,98);color:white;padding:10px;z-index:1000;\
         text-align:center;\">Dev Mode: using {target_base_url}</div>"
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetargetReport {
    /// Elements swapped for a retargeted clone.
    pub replaced: usize,
    /// Video parents explicitly reloaded after a source swap.
    pub video_reloads: usize,
    pub banner_injected: bool,
}

// ---------------------------------------------------------------------------
// Retargeter
// ---------------------------------------------------------------------------

/// One-shot document rewrite, run when the page's structural content is
/// ready. Fires at most once per document; later calls are no-ops.
pub struct Retargeter {
    resolution: Resolution,
    production_asset_base: String,
    fired: bool,
}

impl Retargeter {
    pub fn new(cfg: &Config, resolution: Resolution) -> Self {
        Self {
            resolution,
            production_asset_base: cfg.hosts.production_asset_base.clone(),
            fired: false,
        }
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Run the rewrite. Returns `None` if it already fired. When the page is
    /// not overriding (current equals target, or the page is not production)
    /// the document is left untouched and the report is all zeros.
    pub fn run(&mut self, dom: &mut dyn Dom) -> Option<RetargetReport> {
        if self.fired {
            return None;
        }
        self.fired = true;

        let mut report = RetargetReport::default();
        if !self.resolution.is_overriding() {
            return Some(report);
        }

        let target_base = &self.resolution.target.base_url;
        for asset in dom.find_by_attr_prefix(&self.production_asset_base) {
            let new_value = asset
                .value
                .replacen(&self.production_asset_base, target_base, 1);
            dom.swap_element(&asset, &new_value);
            report.replaced += 1;
            if dom.parent_is_video(&asset) {
                dom.reload_parent_video(&asset);
                report.video_reloads += 1;
            }
        }

        dom.append_to_body(&banner_html(target_base));
        report.banner_injected = true;
        Some(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AssetAttr, AssetRef};
    use crate::resolve::resolve;
    use crate::types::Preference;

    /// In-memory Dom that records every mutation.
    #[derive(Default)]
    struct MockDom {
        assets: Vec<(AssetAttr, String, bool)>, // attr, value, parent is video
        swaps: Vec<(usize, String)>,
        reloads: Vec<usize>,
        appended: Vec<String>,
    }

    impl Dom for MockDom {
        fn find_by_attr_prefix(&self, prefix: &str) -> Vec<AssetRef> {
            self.assets
                .iter()
                .enumerate()
                .filter(|(_, (_, v, _))| v.starts_with(prefix))
                .map(|(i, (attr, v, _))| AssetRef {
                    element: i,
                    attr: *attr,
                    value: v.clone(),
                })
                .collect()
        }

        fn swap_element(&mut self, asset: &AssetRef, new_value: &str) {
            self.swaps.push((asset.element, new_value.to_string()));
        }

        fn parent_is_video(&self, asset: &AssetRef) -> bool {
            self.assets[asset.element].2
        }

        fn reload_parent_video(&mut self, asset: &AssetRef) {
            self.reloads.push(asset.element);
        }

        fn append_to_body(&mut self, html: &str) {
            self.appended.push(html.to_string());
        }
    }

    fn overriding_resolution() -> Resolution {
        resolve(
            &Config::default(),
            "www.example.com",
            "https://www.example.com",
            Some("true"),
            None,
        )
        .unwrap()
    }

    fn prod_dom() -> MockDom {
        MockDom {
            assets: vec![
                (
                    AssetAttr::Src,
                    "https://assets.example.com/js/app.js".to_string(),
                    false,
                ),
                (
                    AssetAttr::Href,
                    "https://assets.example.com/css/site.css".to_string(),
                    false,
                ),
                (
                    AssetAttr::Src,
                    "https://assets.example.com/media/intro.mp4".to_string(),
                    true,
                ),
                (AssetAttr::Src, "https://cdn.other.net/lib.js".to_string(), false),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn overriding_rewrites_production_assets() {
        let cfg = Config::default();
        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, overriding_resolution());
        let report = retargeter.run(&mut dom).unwrap();

        assert_eq!(report.replaced, 3);
        assert!(report.banner_injected);
        assert_eq!(
            dom.swaps[0],
            (0, "https://localhost:3902/js/app.js".to_string())
        );
        assert_eq!(
            dom.swaps[1],
            (1, "https://localhost:3902/css/site.css".to_string())
        );
        // Third-party assets are untouched
        assert!(!dom.swaps.iter().any(|(i, _)| *i == 3));
    }

    #[test]
    fn video_source_swap_reloads_parent() {
        let cfg = Config::default();
        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, overriding_resolution());
        let report = retargeter.run(&mut dom).unwrap();

        assert_eq!(report.video_reloads, 1);
        assert_eq!(dom.reloads, vec![2]);
    }

    #[test]
    fn banner_appended_exactly_once() {
        let cfg = Config::default();
        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, overriding_resolution());
        retargeter.run(&mut dom).unwrap();

        assert_eq!(dom.appended.len(), 1);
        assert!(dom.appended[0].contains(BANNER_CLASS));
        assert!(dom.appended[0].contains("https://localhost:3902"));
    }

    #[test]
    fn fires_at_most_once() {
        let cfg = Config::default();
        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, overriding_resolution());
        assert!(retargeter.run(&mut dom).is_some());
        assert!(retargeter.run(&mut dom).is_none());
        assert_eq!(dom.appended.len(), 1);
    }

    #[test]
    fn no_override_means_no_mutation() {
        let cfg = Config::default();
        let resolution = resolve(
            &cfg,
            "www.example.com",
            "https://www.example.com",
            None,
            None,
        )
        .unwrap();
        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, resolution);
        let report = retargeter.run(&mut dom).unwrap();

        assert_eq!(report, RetargetReport::default());
        assert!(dom.swaps.is_empty());
        assert!(dom.appended.is_empty());
    }

    #[test]
    fn non_production_page_never_rewrites() {
        // A PR page overridden to local dev fetches local bundles but does
        // not touch the document: the rewrite is production-page only.
        let cfg = Config::default();
        let resolution = resolve(
            &cfg,
            "example-pr-4.example.dev",
            "https://example-pr-4.example.dev",
            None,
            Some(Preference::LocalDev),
        )
        .unwrap();
        assert!(!resolution.is_overriding());

        let mut dom = prod_dom();
        let mut retargeter = Retargeter::new(&cfg, resolution);
        let report = retargeter.run(&mut dom).unwrap();
        assert_eq!(report, RetargetReport::default());
        assert!(dom.swaps.is_empty());
    }
}
