use log2::*;
use std::path::Path;
use url::Url;

use crate::error::MirrorError;
use crate::origin::Rejection;
use crate::planner::TagKind;

/// Receives progress events of a mirroring run.
pub trait MirrorSink: Send + Sync {
    fn page_fetched(&self, url: &Url);
    fn resource_saved(&self, url: &Url, path: &Path);
    fn resource_skipped(&self, kind: TagKind, reference: &str, reason: &Rejection);
    fn resource_failed(&self, error: &MirrorError);
}

/// Forwards events to the `log2` logger
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MirrorSink for LogSink {
    fn page_fetched(&self, url: &Url) {
        info!("Fetched page {}", url);
    }

    fn resource_saved(&self, url: &Url, path: &Path) {
        info!("✔  {}", url);
        debug!("Saved {} to {:?}", url, path);
    }

    fn resource_skipped(&self, kind: TagKind, reference: &str, reason: &Rejection) {
        debug!("Skipped <{}> {}: {}", kind, reference, reason);
    }

    fn resource_failed(&self, error: &MirrorError) {
        warn!("{}", error);
    }
}
