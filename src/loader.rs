//! Image acquisition from local paths and HTTP(S) URLs.
//!
//! The loader resolves an input descriptor into a decoded RGB image. URL
//! inputs are fetched with a blocking HTTP client under a bounded timeout;
//! everything else is treated as a filesystem path. All acquisition
//! failures (network, status, decode) surface as `ClassifierError` values,
//! and `try_load` reduces them to absence for callers that only want to
//! know whether an image is available.

use crate::core::constants::{DEFAULT_FETCH_TIMEOUT, DEFAULT_PARALLEL_THRESHOLD};
use crate::core::errors::ClassifierError;
use crate::utils::{decode_image, load_image};
use image::RgbImage;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// A parsed input descriptor: either a local path or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A filesystem path.
    Path(PathBuf),
    /// An http:// or https:// URL.
    Url(String),
}

impl ImageSource {
    /// Parses an input descriptor.
    ///
    /// Strings starting with `http://` or `https://` are URLs; everything
    /// else is a path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            ImageSource::Url(input.to_string())
        } else {
            ImageSource::Path(PathBuf::from(input))
        }
    }

    /// Returns true for URL sources.
    pub fn is_url(&self) -> bool {
        matches!(self, ImageSource::Url(_))
    }
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Path(p) => write!(f, "{}", p.display()),
            ImageSource::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Loads RGB images from paths and URLs.
#[derive(Debug)]
pub struct ImageLoader {
    http: reqwest::blocking::Client,
    parallel_threshold: usize,
}

impl ImageLoader {
    /// Creates a loader with the default fetch timeout.
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a loader with a custom fetch timeout.
    ///
    /// The timeout bounds the whole HTTP request; after it elapses the load
    /// fails rather than hangs.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ClassifierError> {
        if timeout.is_zero() {
            return Err(ClassifierError::config_error(
                "fetch timeout must be greater than 0",
            ));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ClassifierError::config_error(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Sets the threshold past which batch loading goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Loads an image from a path or URL descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Fetch` for network and HTTP status
    /// failures and `ClassifierError::ImageLoad` for decode failures.
    pub fn load(&self, input: &str) -> Result<RgbImage, ClassifierError> {
        match ImageSource::parse(input) {
            ImageSource::Url(url) => self.fetch(&url),
            ImageSource::Path(path) => load_image(&path),
        }
    }

    /// Loads an image, reducing any failure to absence.
    ///
    /// The failure is logged; callers only check for `None` and prompt for
    /// different input.
    pub fn try_load(&self, input: &str) -> Option<RgbImage> {
        match self.load(input) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("failed to load image from '{}': {}", input, e);
                None
            }
        }
    }

    /// Loads a batch of descriptors, in parallel past the threshold.
    ///
    /// # Errors
    ///
    /// Fails on the first descriptor that cannot be loaded.
    pub fn load_batch<S: AsRef<str> + Sync>(
        &self,
        inputs: &[S],
    ) -> Result<Vec<RgbImage>, ClassifierError> {
        if inputs.len() > self.parallel_threshold {
            use rayon::prelude::*;
            inputs.par_iter().map(|s| self.load(s.as_ref())).collect()
        } else {
            inputs.iter().map(|s| self.load(s.as_ref())).collect()
        }
    }

    fn fetch(&self, url: &str) -> Result<RgbImage, ClassifierError> {
        debug!("fetching image from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ClassifierError::fetch_error(url, e))?;

        let bytes = response
            .bytes()
            .map_err(|e| ClassifierError::fetch_error(url, e))?;

        decode_image(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse_dispatch() {
        assert!(ImageSource::parse("https://example.com/road.jpg").is_url());
        assert!(ImageSource::parse("http://example.com/road.jpg").is_url());
        assert!(!ImageSource::parse("road.jpg").is_url());
        assert!(!ImageSource::parse("/data/road.jpg").is_url());
        // No scheme sniffing beyond the two prefixes
        assert!(!ImageSource::parse("ftp://example.com/road.jpg").is_url());
        assert!(!ImageSource::parse("httpserver/road.jpg").is_url());
    }

    #[test]
    fn test_loader_rejects_zero_timeout() {
        assert!(ImageLoader::with_timeout(Duration::ZERO).is_err());
    }

    #[test]
    fn test_load_missing_path_is_absence() {
        let loader = ImageLoader::new().unwrap();
        assert!(loader.load("/no/such/road.jpg").is_err());
        assert!(loader.try_load("/no/such/road.jpg").is_none());
    }

    #[test]
    fn test_load_batch_propagates_failure() {
        let loader = ImageLoader::new().unwrap();
        let result = loader.load_batch(&["/no/such/a.jpg", "/no/such/b.jpg"]);
        assert!(result.is_err());
    }

    // Requires network access.
    #[test]
    #[ignore]
    fn test_fetch_404_is_load_failure() {
        let loader = ImageLoader::new().unwrap();
        let result = loader.load("https://httpbin.org/status/404");
        assert!(matches!(result, Err(ClassifierError::Fetch { .. })));
        assert!(loader.try_load("https://httpbin.org/status/404").is_none());
    }
}
