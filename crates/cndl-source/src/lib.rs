//! Release catalog and mirror rewriting for VS Code downloads.
//!
//! # Architecture
//!
//! - `variant.rs` - The closed set of distribution targets
//! - `catalog.rs` - Variant to upstream "latest stable" URL table
//! - `rewrite.rs` - Host substitution and file name derivation
//! - `server.rs` - Server bundle override and install target layout
//! - `plan.rs` - Tagged download plan handed to the downloader

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use plan::Plan;
pub use rewrite::{ResolvedDownload, file_name, resolve_download, rewrite_host};
pub use server::{InstallTarget, SERVER_BUNDLE, ServerBundle};
pub use variant::Variant;

/// Preferred mirror serving the payloads behind the upstream redirects.
pub const MIRROR_HOST: &str = "vscode.cdn.azure.cn";

mod catalog;
mod error;
mod plan;
mod rewrite;
mod server;
mod variant;
