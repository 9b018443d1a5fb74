use std::fmt;
use url::Url;

/// Substring excluding a reference when no markers are configured
pub const DEFAULT_NOISE_MARKER: &str = "jquery";

/// Why a reference is not mirrored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Blank or fragment-only reference
    Empty,
    /// Reference contains a configured noise marker
    NoiseMarker(String),
    /// Reference points at another host
    CrossOrigin(String),
    /// Reference cannot be turned into a URL
    Unparseable(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty reference"),
            Rejection::NoiseMarker(marker) => write!(f, "contains noise marker `{}`", marker),
            Rejection::CrossOrigin(host) => write!(f, "foreign host {}", host),
            Rejection::Unparseable(reason) => write!(f, "unparseable: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Url),
    Rejected(Rejection),
}

impl Resolution {
    pub fn into_url(self) -> Option<Url> {
        match self {
            Resolution::Resolved(url) => Some(url),
            Resolution::Rejected(_) => None,
        }
    }
}

/// Decides which references of a page are mirrored and where they live.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    noise_markers: Vec<String>,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self::new(vec![DEFAULT_NOISE_MARKER.to_string()])
    }
}

impl OriginPolicy {
    pub fn new(noise_markers: Vec<String>) -> Self {
        Self { noise_markers }
    }

    /// Resolves `reference` (a raw `src`/`href` value) against `page_url`.
    ///
    /// Checks run in order, first match wins:
    /// 1. a noise marker anywhere in the reference rejects it
    /// 2. a reference equal to the page path is the page itself
    /// 3. a reference without scheme is joined onto the page origin
    /// 4. an absolute reference on the page host is kept as-is
    /// 5. anything else is foreign and rejected
    pub fn resolve(&self, reference: &str, page_url: &Url) -> Resolution {
        let reference = reference.trim();
        if reference.is_empty() || reference.starts_with('#') {
            return Resolution::Rejected(Rejection::Empty);
        }

        if let Some(marker) = self
            .noise_markers
            .iter()
            .find(|marker| !marker.is_empty() && reference.contains(marker.as_str()))
        {
            return Resolution::Rejected(Rejection::NoiseMarker(marker.clone()));
        }

        if page_url.path() == reference {
            return Resolution::Resolved(page_url.clone());
        }

        let url = match Url::parse(reference) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match page_url.join(reference) {
                Ok(url) => url,
                Err(e) => return Resolution::Rejected(Rejection::Unparseable(e.to_string())),
            },
            Err(e) => return Resolution::Rejected(Rejection::Unparseable(e.to_string())),
        };

        if same_host(&url, page_url) {
            Resolution::Resolved(url)
        } else {
            let host = url.host_str().unwrap_or(url.scheme()).to_string();
            Resolution::Rejected(Rejection::CrossOrigin(host))
        }
    }
}

/// Origins are compared by host only, ports are ignored
pub fn same_host(url: &Url, other: &Url) -> bool {
    match (url.host_str(), other.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
