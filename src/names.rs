//! Naming rules turning URLs into file and directory names.
//!
//! Every name written by the mirror goes through [`named`], so the directory
//! created for a page and the prefix of each rewritten reference agree
//! byte for byte.

use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::error::MirrorError;

pub const HTML_SUFFIX: &str = ".html";
pub const DIR_SUFFIX: &str = "_files";
/// Value of `--output` meaning "the working directory"
pub const CURRENT_DIR_SENTINEL: &str = "current";

const DOT: char = '.';
const DASH: &str = "-";
const SLASH: char = '/';

/// Dash-normalized host followed by the dash-normalized path.
///
/// `https://example.com/a/b` gives `example-com-a-b`. Trailing slashes are
/// dropped, so the root page gives the host alone. Query and fragment are not
/// part of the slug.
pub fn slug(url: &Url) -> Result<String, MirrorError> {
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| MirrorError::MalformedUrl(url.to_string()))?;
    let path = url.path().trim_end_matches(SLASH);

    Ok(format!(
        "{}{}",
        host.replace(DOT, DASH),
        path.replace(SLASH, DASH)
    ))
}

/// [`slug`] with `suffix` appended: `.html` for the page, `_files` for the
/// resource directory, nothing for a resource.
pub fn named(url: &Url, suffix: &str) -> Result<String, MirrorError> {
    Ok(slug(url)? + suffix)
}

/// Where the mirrored page should be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDir {
    Current,
    Path(PathBuf),
}

impl OutputDir {
    pub fn base(&self) -> std::io::Result<PathBuf> {
        match self {
            OutputDir::Current => std::env::current_dir(),
            OutputDir::Path(path) => Ok(path.clone()),
        }
    }
}

impl FromStr for OutputDir {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CURRENT_DIR_SENTINEL {
            Ok(OutputDir::Current)
        } else {
            Ok(OutputDir::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for OutputDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputDir::Current => write!(f, "{}", CURRENT_DIR_SENTINEL),
            OutputDir::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output locations of one mirroring run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePaths {
    /// `<output>/<slug>.html`
    pub html_path: PathBuf,
    /// `<output>/<slug>_files`
    pub resource_dir: PathBuf,
    /// `<slug>_files`, the prefix of every rewritten reference
    pub resource_dir_name: String,
}

impl PagePaths {
    pub fn new(base: &Path, page_url: &Url) -> Result<Self, MirrorError> {
        let resource_dir_name = named(page_url, DIR_SUFFIX)?;
        Ok(Self {
            html_path: base.join(named(page_url, HTML_SUFFIX)?),
            resource_dir: base.join(&resource_dir_name),
            resource_dir_name,
        })
    }

    /// Resolves the `current` sentinel before naming the artifacts.
    pub fn resolve(output: &OutputDir, page_url: &Url) -> Result<Self, MirrorError> {
        let base = output.base().map_err(MirrorError::OutputDir)?;
        Self::new(&base, page_url)
    }
}
