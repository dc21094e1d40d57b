use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to `{0}` failed: {1}")]
    Request(String, #[source] reqwest::Error),
    #[error("`{0}` responded with status `{1}`")]
    Status(String, u16),
    #[error("could not write `{0}`: {1}")]
    Write(PathBuf, #[source] io::Error),
}

/// Source of remote resources. Every call is a single blocking GET.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FetchError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `timeout` bounds each request including its body. `None` disables the
    /// client's default 30 second limit.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("revivemii-patcher/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(url.to_string(), status.as_u16()));
        }

        Ok(Box::new(response))
    }
}

/// Streams `url` into a freshly created file at `dest`, replacing any file
/// already there. Returns the number of bytes written.
pub fn download_file<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    dest: &Path,
) -> Result<u64, FetchError> {
    info!("Downloading {} to {}", url, dest.display());

    let mut body = transport.get(url)?;
    let mut out = File::create(dest).map_err(|e| FetchError::Write(dest.to_path_buf(), e))?;
    let n = io::copy(&mut body, &mut out).map_err(|e| FetchError::Write(dest.to_path_buf(), e))?;

    debug!(bytes = n, "download complete");
    Ok(n)
}
