pub mod config;
pub mod document;
pub mod fetch;
pub mod runner;
pub mod sink;
pub mod storage;


pub use config::{DEFAULT_THREAD_COUNT, MirrorConfig, MirrorConfigRef, REQUEST_TIMEOUT_SEC};
pub use document::{PageDocument, Rewrites, TagReference};
pub use fetch::{Fetched, HttpTransport, Transport};
pub use runner::{Mirror, MirrorReport, download};
pub use sink::{LogSink, MirrorSink};
pub use storage::{LocalStorage, Storage};
