use std::sync::Arc;
use url::Url;

use crate::names::OutputDir;
use crate::origin::DEFAULT_NOISE_MARKER;

/// Default timeout for page and resource requests in seconds
pub const REQUEST_TIMEOUT_SEC: u64 = 10;
/// Default number of resources downloaded at once
pub const DEFAULT_THREAD_COUNT: usize = 8;

/// Configuration of one mirroring run
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub page_url: Url,
    pub output: OutputDir,
    pub thread_count: usize,
    pub request_timeout_sec: u64,
    pub noise_markers: Vec<String>,
}

impl MirrorConfig {
    pub fn new(page_url: Url, output: OutputDir) -> Self {
        Self {
            page_url,
            output,
            thread_count: DEFAULT_THREAD_COUNT,
            request_timeout_sec: REQUEST_TIMEOUT_SEC,
            noise_markers: vec![DEFAULT_NOISE_MARKER.to_string()],
        }
    }

    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn with_noise_markers(mut self, markers: Vec<String>) -> Self {
        self.noise_markers = markers;
        self
    }
}

pub type MirrorConfigRef = Arc<MirrorConfig>;
