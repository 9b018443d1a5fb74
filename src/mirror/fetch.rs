use std::time::Duration;
use encoding_rs::{Encoding, UTF_8};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::error::FetchError;

/// Body of a successful response
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    /// Raw `Content-Type` header, if any
    pub content_type: Option<String>,
}

impl Fetched {
    /// Charset announced by the `Content-Type` header, UTF-8 when absent or unknown
    pub fn encoding(&self) -> &'static Encoding {
        self.content_type
            .as_deref()
            .and_then(charset_from_content_type)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8)
    }
}

fn charset_from_content_type(content_type: &str) -> Option<&str> {
    for part in content_type.split(';').skip(1) {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("charset") {
            continue;
        }

        let label = value.trim().trim_matches('"').trim_matches('\'');
        if !label.is_empty() {
            return Some(label);
        }
    }

    None
}

/// Issues GET requests for the mirror.
pub trait Transport: Send + Sync {
    /// Non-success statuses are reported as [`FetchError::Status`].
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Fetched, FetchError>> + Send;
}

/// `reqwest` backed transport with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout_sec: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(timeout_sec),
        }
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<Fetched, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok(Fetched {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
