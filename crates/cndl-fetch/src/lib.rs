//! Blocking HTTP plumbing for the download pipeline.
//!
//! - `client.rs` - Client settings, redirect probing and body sources
//! - `stream.rs` - Fixed-size chunk iterator over a body
//! - `tracker.rs` - Progress tracking (indicatif)
//! - `download.rs` - Streaming a body into a file

pub use client::{
    BodySource, ClientSetting, ClientSettingError, RedirectProbe, ReqwestClient, follow_location,
};
pub use download::{Body, download_to};
pub use error::{FetchError, Result};
pub use reqwest::StatusCode;
pub use stream::{CHUNK_SIZE, Chunk, Chunks};
pub use tracker::{
    NoopTracker, ProgressTracker, ProgressTrackerBuilder, Tracker, TrackerBuilder,
};

mod client;
mod download;
mod error;
mod stream;
mod tracker;
