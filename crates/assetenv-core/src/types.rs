use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Where the page is being served from. Computed once from the hostname and
/// immutable for the rest of the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    PullRequest(u32),
    LocalDevelopment,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::PullRequest(id) => write!(f, "pull-request #{id}"),
            Environment::LocalDevelopment => f.write_str("local-development"),
        }
    }
}

// ---------------------------------------------------------------------------
// Preference
// ---------------------------------------------------------------------------

static PR_VALUE_RE: OnceLock<Regex> = OnceLock::new();

fn pr_value_re() -> &'static Regex {
    PR_VALUE_RE.get_or_init(|| Regex::new(r"^pr-(\d+)$").unwrap())
}

/// A whitelisted override value: the persisted form of the `dev` query
/// parameter. `false` is not a preference — it clears one (see
/// [`crate::preference::Directive`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// `true` — target the local-development environment.
    LocalDev,
    /// `prod` — pin the production target even on a non-production host.
    Production,
    /// `pr-<n>` — target the pull-request environment for PR `n`.
    PullRequest(u32),
}

impl Preference {
    /// Parse a raw query/persisted value. Anything outside the whitelist
    /// yields `None` — untrusted input is ignored, never an error.
    pub fn parse(value: &str) -> Option<Preference> {
        match value {
            "true" => Some(Preference::LocalDev),
            "prod" => Some(Preference::Production),
            _ => pr_value_re()
                .captures(value)
                .and_then(|c| c[1].parse::<u32>().ok())
                .map(Preference::PullRequest),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preference::LocalDev => f.write_str("true"),
            Preference::Production => f.write_str("prod"),
            Preference::PullRequest(id) => write!(f, "pr-{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
