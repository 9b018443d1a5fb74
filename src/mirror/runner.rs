use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::config::MirrorConfigRef;
use super::document::{PageDocument, Rewrites};
use super::fetch::{HttpTransport, Transport};
use super::sink::{LogSink, MirrorSink};
use super::storage::{LocalStorage, Storage};
use crate::error::MirrorError;
use crate::names::PagePaths;
use crate::origin::OriginPolicy;
use crate::planner::{DownloadPlan, ResourcePathPlanner, TagKind};

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    pub page_path: PathBuf,
    pub resource_dir: PathBuf,
    /// Files written to the resource directory
    pub saved: usize,
    /// Files that could not be fetched or written
    pub failed: usize,
    /// Distinct references left alone by the origin policy
    pub skipped: usize,
}

/// One file to download and every tag occurrence pointing at it
struct PendingDownload {
    plan: DownloadPlan,
    /// Rewrite keys, the attribute text as written in the markup
    references: Vec<(TagKind, String)>,
}

type DownloadHandle = JoinHandle<(PendingDownload, Result<PathBuf, MirrorError>)>;

/// Mirrors one page through the given collaborators.
pub struct Mirror<T, S, L> {
    config: MirrorConfigRef,
    transport: Arc<T>,
    storage: Arc<S>,
    sink: Arc<L>,
}

impl<T, S, L> Mirror<T, S, L>
where
    T: Transport + 'static,
    S: Storage + 'static,
    L: MirrorSink + 'static,
{
    pub fn new(config: MirrorConfigRef, transport: Arc<T>, storage: Arc<S>, sink: Arc<L>) -> Self {
        Self {
            config,
            transport,
            storage,
            sink,
        }
    }

    pub async fn run(&self) -> Result<MirrorReport, MirrorError> {
        let page_url = &self.config.page_url;
        let paths = PagePaths::resolve(&self.config.output, page_url)?;

        let page = self
            .transport
            .fetch(page_url)
            .await
            .map_err(|source| MirrorError::PageFetchFailed {
                url: page_url.clone(),
                source,
            })?;
        self.sink.page_fetched(page_url);

        let encoding = page.encoding();
        let document = PageDocument::parse(page.bytes, encoding);
        let planner = ResourcePathPlanner::new(
            OriginPolicy::new(self.config.noise_markers.clone()),
            page_url.clone(),
            paths.resource_dir_name.clone(),
        );
        let (downloads, skipped) = self.collect_downloads(&document, &planner)?;

        self.storage
            .ensure_dir(&paths.resource_dir)
            .await
            .map_err(|source| MirrorError::PageWriteFailed {
                path: paths.resource_dir.clone(),
                source,
            })?;

        let handles = self.spawn_downloads(downloads, &paths.resource_dir);

        let mut rewrites = Rewrites::new();
        let mut saved = 0;
        let mut failed = 0;
        for handle in handles {
            match handle.await {
                Ok((download, Ok(_))) => {
                    saved += 1;
                    for reference in download.references {
                        rewrites.insert(reference, download.plan.replacement.clone());
                    }
                }
                // the task already reported its own error to the sink
                Ok((_, Err(e))) if e.is_recoverable() => failed += 1,
                Ok((_, Err(e))) => return Err(e),
                Err(e) => {
                    failed += 1;
                    self.sink.resource_failed(&MirrorError::Worker(e));
                }
            }
        }

        let html = document.serialize(&rewrites)?;
        self.storage
            .write_file(&paths.html_path, html)
            .await
            .map_err(|source| MirrorError::PageWriteFailed {
                path: paths.html_path.clone(),
                source,
            })?;

        Ok(MirrorReport {
            page_path: paths.html_path,
            resource_dir: paths.resource_dir,
            saved,
            failed,
            skipped,
        })
    }

    /// Plans every distinct (kind, markup value) pair of the page. References
    /// ending up in the same file share one download.
    fn collect_downloads(
        &self,
        document: &PageDocument,
        planner: &ResourcePathPlanner,
    ) -> Result<(Vec<PendingDownload>, usize), MirrorError> {
        let mut seen = HashSet::new();
        let mut downloads: Vec<PendingDownload> = Vec::new();
        let mut by_replacement: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0;

        for kind in TagKind::ALL {
            for reference in document.find_all(kind)? {
                if !seen.insert((kind, reference.raw.clone())) {
                    continue;
                }

                match planner.try_plan(&reference.value, kind) {
                    Ok(plan) => match by_replacement.get(&plan.replacement) {
                        Some(&index) => downloads[index].references.push((kind, reference.raw)),
                        None => {
                            by_replacement.insert(plan.replacement.clone(), downloads.len());
                            downloads.push(PendingDownload {
                                plan,
                                references: vec![(kind, reference.raw)],
                            });
                        }
                    },
                    Err(rejection) => {
                        skipped += 1;
                        self.sink.resource_skipped(kind, &reference.value, &rejection);
                    }
                }
            }
        }

        Ok((downloads, skipped))
    }

    fn spawn_downloads(&self, downloads: Vec<PendingDownload>, resource_dir: &Path) -> Vec<DownloadHandle> {
        let permits = Arc::new(Semaphore::new(self.config.thread_count.max(1)));

        downloads
            .into_iter()
            .map(|download| {
                let permits = Arc::clone(&permits);
                let transport = Arc::clone(&self.transport);
                let storage = Arc::clone(&self.storage);
                let sink = Arc::clone(&self.sink);
                let resource_dir = resource_dir.to_path_buf();

                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    let result =
                        download_resource(transport.as_ref(), storage.as_ref(), &download.plan, &resource_dir)
                            .await;
                    match &result {
                        Ok(path) => sink.resource_saved(&download.plan.url, path),
                        Err(e) => sink.resource_failed(e),
                    }
                    (download, result)
                })
            })
            .collect()
    }
}

/// Fetches one resource and stores it under `resource_dir`.
async fn download_resource<T: Transport, S: Storage>(
    transport: &T,
    storage: &S,
    plan: &DownloadPlan,
    resource_dir: &Path,
) -> Result<PathBuf, MirrorError> {
    let fetched = transport
        .fetch(&plan.url)
        .await
        .map_err(|source| MirrorError::ResourceFetchFailed {
            url: plan.url.clone(),
            source,
        })?;

    let path = resource_dir.join(&plan.file_name);
    storage
        .write_file(&path, fetched.bytes)
        .await
        .map_err(|source| MirrorError::ResourceWriteFailed {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// Mirrors `config.page_url` over HTTP to the local disk, logging through `log2`.
pub async fn download(config: MirrorConfigRef) -> Result<MirrorReport, MirrorError> {
    let transport = Arc::new(HttpTransport::new(config.request_timeout_sec));
    Mirror::new(config, transport, Arc::new(LocalStorage), Arc::new(LogSink))
        .run()
        .await
}
