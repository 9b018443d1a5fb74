use log2::*;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

use page_loader::config;
use page_loader::mirror;

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("page_loader"))
        .compress(false)
        .level(cfg.log_level.to_string())
        .start();

    let mirror_config = Arc::new(cfg.mirror_config()?);
    info!("Downloading {} to {}", mirror_config.page_url, mirror_config.output);

    match mirror::download(mirror_config).await {
        Ok(report) => {
            info!(
                "Saved {} resources ({} failed, {} skipped) in {:?}",
                report.saved,
                report.failed,
                report.skipped,
                START_TIME.elapsed()
            );
            println!("Page was successfully downloaded into {}", report.page_path.display());
        }
        Err(e) => {
            error!("Download failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
