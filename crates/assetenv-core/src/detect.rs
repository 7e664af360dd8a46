use crate::error::{AssetEnvError, Result};
use crate::hosts::HostsConfig;
use crate::types::Environment;

/// Classify a hostname into its deployment environment.
///
/// Pure and side-effect free. An unrecognized host is a fatal error: the page
/// cannot determine where it is running, which signals a deployment mismatch
/// that must be fixed upstream. No fallback, no retry.
pub fn detect(hosts: &HostsConfig, host: &str) -> Result<Environment> {
    if host == hosts.local_dev {
        return Ok(Environment::LocalDevelopment);
    }
    if host == hosts.production {
        return Ok(Environment::Production);
    }
    if let Some(caps) = hosts.pull_request_regex()?.captures(host) {
        let id = caps
            .get(1)
            .ok_or_else(|| AssetEnvError::MissingIdCapture(hosts.pull_request_pattern.clone()))?;
        // A matching host whose digits overflow u32 is still unknown
        if let Ok(id) = id.as_str().parse::<u32>() {
            return Ok(Environment::PullRequest(id));
        }
    }
    Err(AssetEnvError::UnknownHost(host.to_string()))
}
