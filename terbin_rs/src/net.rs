//! HTTP downloads for the mod index, mod manifests and release archives.
//!
//! Locations that are not `http(s)://` URLs are read from the local
//! filesystem (`file://` prefix optional), which lets an index be mirrored
//! on disk.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Result, TerbinError};
use crate::progress;

/// Connect timeout for every request. Transfers themselves are unbounded.
const CONNECT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("terbin/", env!("CARGO_PKG_VERSION"));

/// Source of remote documents and archives.
pub trait Fetcher {
    /// Fetch a document as text.
    fn fetch_text(&self, url: &str) -> Result<String>;

    /// Stream `url` into `dest`, returning the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// [`Fetcher`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    connect_timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    fn client(&self, url: &str) -> Result<Client> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TerbinError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        tracing::debug!(url, "GET");
        let response = self
            .client(url)?
            .get(url)
            .send()
            .map_err(|e| TerbinError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TerbinError::Http {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        Ok(response)
    }
}

/// Local path for non-HTTP locations.
fn local_path(url: &str) -> Option<&Path> {
    if is_http(url) {
        return None;
    }
    Some(Path::new(url.strip_prefix("file://").unwrap_or(url)))
}

pub fn is_http(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        if let Some(path) = local_path(url) {
            return fs::read_to_string(path).map_err(|e| TerbinError::io(path, e));
        }
        self.get(url)?.text().map_err(|e| TerbinError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        if let Some(path) = local_path(url) {
            return fs::copy(path, dest).map_err(|e| TerbinError::io(path, e));
        }

        let mut response = self.get(url)?;
        let bar = progress::byte_bar(response.content_length(), "Downloading");
        let mut file = File::create(dest).map_err(|e| TerbinError::io(dest, e))?;
        let mut buffer = vec![0u8; 64 * 1024];
        let mut written = 0u64;
        loop {
            let read = response.read(&mut buffer).map_err(|e| TerbinError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read])
                .map_err(|e| TerbinError::io(dest, e))?;
            written += read as u64;
            bar.set_position(written);
        }
        bar.finish_and_clear();
        tracing::debug!(url, bytes = written, "download complete");
        Ok(written)
    }
}
