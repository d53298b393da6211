// API client module: a small blocking HTTP client that PUTs one prepared
// file to a transfer.sh compatible server. It stays synchronous on purpose;
// the whole run is a single request.

use crate::config::Endpoint;
use crate::content::PreparedContent;
use crate::error::{Result, TransferError};
use crate::progress::{ProgressReader, TransferObserver};
use log::debug;
use reqwest::blocking::{Body, Client};
use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::{StatusCode, Url};
use std::io::Read;
use std::time::Duration;

/// Server-side retention hints. Unset or empty values are not sent and the
/// server applies its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Retention {
    pub max_days: Option<String>,
    pub max_downloads: Option<String>,
}

/// Transport settings for the upload.
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    /// Whole-request timeout. `None` waits as long as the transfer takes.
    pub timeout: Option<Duration>,
    /// Ignore `HTTP(S)_PROXY` and connect directly.
    pub no_proxy: bool,
}

/// What came back from the server, fully read.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Blocking reqwest client bound to one endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: Endpoint,
}

impl ApiClient {
    pub fn new(endpoint: Endpoint, options: &UploadOptions) -> Result<Self> {
        // reqwest's blocking client defaults to 30s, too short for big uploads.
        let mut builder = Client::builder().timeout(options.timeout);
        if options.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(TransferError::Network)?;
        Ok(ApiClient { client, endpoint })
    }

    /// `{base_url}/{name}`, with `name` escaped as a single path segment.
    pub fn upload_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint.base_url)
            .map_err(|e| TransferError::Config(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TransferError::Config("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// Stream `content` to the server and read the whole reply.
    ///
    /// The body is sent with a fixed `Content-Length` equal to
    /// `content.size`; the observer sees every chunk handed to the socket and
    /// is finished whether or not the request succeeds.
    pub fn upload<O>(&self, content: PreparedContent, retention: &Retention, observer: O) -> Result<Reply>
    where
        O: TransferObserver + Clone,
    {
        let url = self.upload_url(&content.name)?;
        debug!("PUT {} ({} bytes)", url, content.size);

        let size = content.size;
        let reader = ProgressReader::new(content.source, observer.clone());
        let mut req = self
            .client
            .put(url)
            .basic_auth(&self.endpoint.user, Some(&self.endpoint.pass))
            .header(CONTENT_LENGTH, size)
            .body(Body::sized(reader, size));
        if let Some(days) = non_empty(&retention.max_days) {
            req = req.header("Max-Days", days);
        }
        if let Some(downloads) = non_empty(&retention.max_downloads) {
            req = req.header("Max-Downloads", downloads);
        }

        let res = req.send();
        observer.finish();
        let mut res = res.map_err(TransferError::Network)?;

        let status = res.status();
        let headers = res.headers().clone();
        // Error pages are not always UTF-8; keep them readable rather than
        // losing the status to a decoding error.
        let mut raw = Vec::new();
        res.read_to_end(&mut raw)?;
        let body = String::from_utf8_lossy(&raw).into_owned();
        debug!("server replied {}", status);
        Ok(Reply {
            status,
            headers,
            body,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
