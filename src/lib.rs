pub mod config;
pub mod error;
pub mod mirror;
pub mod names;
pub mod origin;
pub mod planner;

pub use error::{FetchError, MirrorError};
pub use mirror::{MirrorConfig, MirrorReport, download};
pub use names::{OutputDir, PagePaths, named, slug};
pub use origin::{OriginPolicy, Rejection, Resolution};
pub use planner::{DownloadPlan, ResourcePathPlanner, TagKind};
