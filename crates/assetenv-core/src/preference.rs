use crate::error::Result;
use crate::io;
use crate::types::Preference;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How long an override sticks after the developer last passed the query
/// parameter. Mirrors the half-hour cookie expiry of the browser loader.
pub const OVERRIDE_TTL_MINUTES: i64 = 30;

// ---------------------------------------------------------------------------
// Directive
// ---------------------------------------------------------------------------

/// What the `dev` query parameter asks us to do with the persisted
/// preference. Computed once per page view, before target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// A whitelisted value: persist it with a fresh expiry.
    Set(Preference),
    /// Literal `false`: explicit opt-out, clear any persisted preference.
    Clear,
    /// Absent or unrecognized: leave the store untouched.
    Keep,
}

impl Directive {
    pub fn from_query(value: Option<&str>) -> Directive {
        match value {
            Some("false") => Directive::Clear,
            Some(v) => Preference::parse(v).map_or(Directive::Keep, Directive::Set),
            None => Directive::Keep,
        }
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    value: String,
    expires_at: DateTime<Utc>,
}

/// File-backed stand-in for the browser's short-lived `dev` cookie.
/// One read and at most one write per resolution, like the page loader.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join("preference.yaml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current preference, or `None` if nothing is stored, the entry has
    /// expired, or the stored value no longer parses (tampered files are
    /// ignored the same way garbage query input is).
    pub fn get(&self) -> Result<Option<Preference>> {
        Ok(self.get_entry()?.map(|(p, _)| p))
    }

    /// Like [`get`](Self::get) but keeps the expiry for display.
    pub fn get_entry(&self) -> Result<Option<(Preference, DateTime<Utc>)>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let Ok(stored) = serde_yaml::from_str::<StoredPreference>(&data) else {
            return Ok(None);
        };
        if stored.expires_at <= Utc::now() {
            return Ok(None);
        }
        Ok(Preference::parse(&stored.value).map(|p| (p, stored.expires_at)))
    }

    pub fn set(&self, preference: Preference) -> Result<()> {
        let stored = StoredPreference {
            value: preference.to_string(),
            expires_at: Utc::now() + Duration::minutes(OVERRIDE_TTL_MINUTES),
        };
        let data = serde_yaml::to_string(&stored)?;
        io::atomic_write(&self.path, data.as_bytes())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Apply the query-parameter side effect. `Keep` never touches the file.
    pub fn apply(&self, directive: Directive) -> Result<()> {
        match directive {
            Directive::Set(p) => self.set(p),
            Directive::Clear => self.clear(),
            Directive::Keep => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
