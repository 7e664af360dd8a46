use crate::detect::detect;
use crate::error::{AssetEnvError, Result};
use crate::hosts::Config;
use crate::preference::Directive;
use crate::types::{Environment, Preference};
use url::Url;

/// Query parameter (and preference name) recognized by the loader.
pub const DEV_PARAM: &str = "dev";

// ---------------------------------------------------------------------------
// Target / Resolution
// ---------------------------------------------------------------------------

/// The environment/base-URL pair assets are actually sourced from for this
/// page view. The base URL is always one of exactly three forms: the
/// production asset base, the local-dev origin, or a PR origin templated
/// with an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub environment: Environment,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    /// Environment detected from the hostname.
    pub current: Environment,
    /// The page's own origin, used when a non-production page self-targets.
    pub origin: String,
    /// Side effect the `dev` query parameter requests on the preference
    /// store. The caller applies it; resolution itself stays pure.
    pub directive: Directive,
    /// The effective preference after the directive, the one the target was
    /// computed from.
    pub preference: Option<Preference>,
    pub target: Target,
}

impl Resolution {
    /// True when a production page is pulling assets from somewhere else.
    /// Only then do we rewrite the document and show the banner.
    pub fn is_overriding(&self) -> bool {
        self.current.is_production() && self.target.environment != self.current
    }
}

// ---------------------------------------------------------------------------
// Resolution logic
// ---------------------------------------------------------------------------

/// Resolve the asset target for one page view.
///
/// Pure: inputs are the hostname, the page origin, the raw `dev` query value,
/// and the stored (unexpired) preference. Outputs are the target plus the
/// directive to apply to the store. The directive takes effect here as if it
/// had already been written, matching the loader's write-then-read-back
/// behavior.
pub fn resolve(
    cfg: &Config,
    host: &str,
    origin: &str,
    dev_param: Option<&str>,
    stored: Option<Preference>,
) -> Result<Resolution> {
    let current = detect(&cfg.hosts, host)?;
    let directive = Directive::from_query(dev_param);
    let preference = match directive {
        Directive::Set(p) => Some(p),
        Directive::Clear => None,
        Directive::Keep => stored,
    };

    let target = match preference {
        Some(Preference::LocalDev) => Target {
            environment: Environment::LocalDevelopment,
            base_url: cfg.hosts.local_dev_origin.clone(),
        },
        Some(Preference::PullRequest(id)) => Target {
            environment: Environment::PullRequest(id),
            base_url: cfg.hosts.pull_request_origin_for(id),
        },
        // A PR or local-dev page with no override loads its own assets
        None if !current.is_production() => Target {
            environment: current,
            base_url: origin.to_string(),
        },
        // No preference on production, or an explicit 'prod' pin
        _ => Target {
            environment: Environment::Production,
            base_url: cfg.hosts.production_asset_base.clone(),
        },
    };

    Ok(Resolution {
        current,
        origin: origin.to_string(),
        directive,
        preference,
        target,
    })
}

/// [`resolve`] with host, origin, and `dev` parameter taken from a page URL.
pub fn resolve_page(cfg: &Config, page: &Url, stored: Option<Preference>) -> Result<Resolution> {
    let host = host_with_port(page);
    let origin = page.origin().ascii_serialization();
    let dev = dev_param(page);
    resolve(cfg, &host, &origin, dev.as_deref(), stored)
}

pub fn parse_page_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| AssetEnvError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Hostname as the loader matches it: `host` plus `:port` when the URL
/// carries an explicit non-default port (`localhost:3902`).
pub fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

pub fn dev_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == DEV_PARAM)
        .map(|(_, v)| v.into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
