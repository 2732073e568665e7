//! Stop sources: the stop API over HTTP and local JSON files.

mod dto;
mod file;
mod http;

pub use file::FileStopSource;
pub use http::{DEFAULT_USER_AGENT, HttpStopSource, HttpStopSourceConfig};
