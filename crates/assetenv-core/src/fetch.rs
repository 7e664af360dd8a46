use crate::error::{AssetEnvError, Result};
use crate::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchedBundle {
    pub path: String,
    pub url: String,
    pub bytes: u64,
    pub file: PathBuf,
}

/// Fetches script bundles from a resolved target base URL.
///
/// URLs are the plain concatenation of base and path, with no cache-busting
/// parameters: the override window depends on the browser reusing the same
/// URL across navigations, and this tool keeps the URLs identical.
pub struct BundleFetcher {
    client: reqwest::blocking::Client,
}

impl BundleFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AssetEnvError::HttpClient)?;
        Ok(Self { client })
    }

    pub fn bundle_url(base_url: &str, path: &str) -> String {
        format!("{base_url}{path}")
    }

    /// Fetch every bundle into `out_dir`, preserving the path layout.
    /// Failures abort immediately; there are no retries.
    pub fn fetch_all(
        &self,
        base_url: &str,
        paths: &[String],
        out_dir: &Path,
    ) -> Result<Vec<FetchedBundle>> {
        io::ensure_dir(out_dir)?;
        let mut fetched = Vec::with_capacity(paths.len());
        for path in paths {
            let url = Self::bundle_url(base_url, path);
            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|source| AssetEnvError::Fetch {
                    url: url.clone(),
                    source,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(AssetEnvError::FetchStatus {
                    url,
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().map_err(|source| AssetEnvError::Fetch {
                url: url.clone(),
                source,
            })?;
            let file = out_dir.join(path.trim_start_matches('/'));
            io::atomic_write(&file, &body)?;
            fetched.push(FetchedBundle {
                path: path.clone(),
                url,
                bytes: body.len() as u64,
                file,
            });
        }
        Ok(fetched)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundle_url_is_plain_concatenation() {
        let url = BundleFetcher::bundle_url("https://localhost:3902", "/js/bundle.js");
        assert_eq!(url, "https://localhost:3902/js/bundle.js");
        // No cache-busting query parameter
        assert!(!url.contains('?'));
    }

    #[test]
    fn fetch_writes_bundle_to_disk() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/js/bundle.js")
            .with_status(200)
            .with_body("console.log('bundle');")
            .create();

        let dir = TempDir::new().unwrap();
        let fetcher = BundleFetcher::new().unwrap();
        let fetched = fetcher
            .fetch_all(&server.url(), &["/js/bundle.js".to_string()], dir.path())
            .unwrap();

        mock.assert();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].bytes, 22);
        let on_disk = std::fs::read_to_string(&fetched[0].file).unwrap();
        assert_eq!(on_disk, "console.log('bundle');");
    }

    #[test]
    fn fetch_preserves_path_layout() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/js/vendor/extra.js")
            .with_status(200)
            .with_body("x")
            .create();

        let dir = TempDir::new().unwrap();
        let fetcher = BundleFetcher::new().unwrap();
        let fetched = fetcher
            .fetch_all(
                &server.url(),
                &["/js/vendor/extra.js".to_string()],
                dir.path(),
            )
            .unwrap();
        assert_eq!(fetched[0].file, dir.path().join("js/vendor/extra.js"));
        assert!(fetched[0].file.exists());
    }

    #[test]
    fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/js/bundle.js")
            .with_status(404)
            .create();

        let dir = TempDir::new().unwrap();
        let fetcher = BundleFetcher::new().unwrap();
        let err = fetcher
            .fetch_all(&server.url(), &["/js/bundle.js".to_string()], dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            AssetEnvError::FetchStatus { status: 404, .. }
        ));
    }

    #[test]
    fn fetch_aborts_on_first_failure() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/a.js").with_status(500).create();
        let second = server.mock("GET", "/b.js").with_status(200).expect(0).create();

        let dir = TempDir::new().unwrap();
        let fetcher = BundleFetcher::new().unwrap();
        let result = fetcher.fetch_all(
            &server.url(),
            &["/a.js".to_string(), "/b.js".to_string()],
            dir.path(),
        );
        assert!(result.is_err());
        second.assert();
    }
}
