use std::fmt;
use url::Url;

use crate::names::{self, HTML_SUFFIX};
use crate::origin::{OriginPolicy, Rejection, Resolution, same_host};

/// Resource-bearing elements the mirror looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Image,
    Link,
    Script,
}

impl TagKind {
    /// Document processing order
    pub const ALL: [TagKind; 3] = [TagKind::Image, TagKind::Link, TagKind::Script];

    pub fn tag_name(self) -> &'static str {
        match self {
            TagKind::Image => "img",
            TagKind::Link => "link",
            TagKind::Script => "script",
        }
    }

    /// Attribute carrying the reference
    pub fn attribute(self) -> &'static str {
        match self {
            TagKind::Image => "src",
            TagKind::Link => "href",
            TagKind::Script => "src",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_name())
    }
}

/// What to fetch for one tag, where to store it and what to write back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub url: Url,
    pub kind: TagKind,
    /// File name inside the resource directory
    pub file_name: String,
    /// `<resource dir>/<file name>`, the new attribute value
    pub replacement: String,
}

/// Computes download plans for the tags of one page.
#[derive(Debug, Clone)]
pub struct ResourcePathPlanner {
    policy: OriginPolicy,
    base_url: Url,
    resource_dir_name: String,
}

impl ResourcePathPlanner {
    pub fn new(policy: OriginPolicy, base_url: Url, resource_dir_name: String) -> Self {
        Self {
            policy,
            base_url,
            resource_dir_name,
        }
    }

    pub fn resolve(&self, reference: &str) -> Resolution {
        self.policy.resolve(reference, &self.base_url)
    }

    /// `None` means the tag is left untouched.
    pub fn plan(&self, reference: &str, kind: TagKind) -> Option<DownloadPlan> {
        self.try_plan(reference, kind).ok()
    }

    /// Like [`plan`](Self::plan) but keeps the reason a tag is skipped.
    pub fn try_plan(&self, reference: &str, kind: TagKind) -> Result<DownloadPlan, Rejection> {
        let url = match self.resolve(reference) {
            Resolution::Resolved(url) => url,
            Resolution::Rejected(rejection) => return Err(rejection),
        };
        // resolution only lets same-host urls through
        debug_assert!(same_host(&url, &self.base_url));

        let mut file_name =
            names::slug(&url).map_err(|e| Rejection::Unparseable(e.to_string()))?;
        if kind == TagKind::Link && !file_name.contains('.') {
            file_name.push_str(HTML_SUFFIX);
        }
        let replacement = format!("{}/{}", self.resource_dir_name, file_name);

        Ok(DownloadPlan {
            url,
            kind,
            file_name,
            replacement,
        })
    }
}
