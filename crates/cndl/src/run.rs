//! One invocation, as a forward-only sequence of stages.
//!
//! `Resolving → Rewriting → (PostProcessing)`, then `PrintOnly` or
//! `Downloading → (Extracting)`, then `Done`. Any error moves straight to
//! `Failed`.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cndl_archive::install_tree;
use cndl_fetch::{BodySource, RedirectProbe, Tracker, download_to};
use cndl_source::{
    Catalog, MIRROR_HOST, Plan, ResolvedDownload, SERVER_BUNDLE, Variant, resolve_download,
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::env::CndlEnv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Rewriting,
    PostProcessing,
    PrintOnly,
    Downloading,
    Extracting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Resolving => "resolving",
            Stage::Rewriting => "rewriting",
            Stage::PostProcessing => "post-processing",
            Stage::PrintOnly => "printing",
            Stage::Downloading => "downloading",
            Stage::Extracting => "extracting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{} already exists; delete it manually and retry", .0.display())]
    InstallationAlreadyExists(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub variant: Variant,
    pub print_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Printed(Url),
    Downloaded { path: PathBuf, bytes: u64 },
    Installed { target: PathBuf, bytes: u64 },
}

pub struct Runner<'a, C> {
    client: &'a C,
    env: &'a CndlEnv,
    mirror: &'a str,
    stage: Stage,
}

impl<'a, C: RedirectProbe + BodySource> Runner<'a, C> {
    pub fn new(client: &'a C, env: &'a CndlEnv) -> Self {
        Self {
            client,
            env,
            mirror: MIRROR_HOST,
            stage: Stage::Resolving,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Execute `req`. Print-only output goes to `out`; `tracker` is built once
    /// the body's file name and length are known.
    pub fn run<W, T, F>(&mut self, req: &Request, out: &mut W, tracker: F) -> Result<Outcome>
    where
        W: Write,
        T: Tracker<u64>,
        F: FnOnce(&str, Option<u64>) -> T,
    {
        match self.execute(req, out, tracker) {
            Ok(outcome) => {
                self.advance(Stage::Done);
                Ok(outcome)
            }
            Err(e) => {
                let failed_at = self.stage;
                self.advance(Stage::Failed);
                Err(e.context(format!("{failed_at} failed")))
            }
        }
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }

    fn execute<W, T, F>(&mut self, req: &Request, out: &mut W, tracker: F) -> Result<Outcome>
    where
        W: Write,
        T: Tracker<u64>,
        F: FnOnce(&str, Option<u64>) -> T,
    {
        let catalog_url = Catalog::global()?.resolve(req.variant)?;
        debug!(variant = %req.variant, url = %catalog_url, "catalog");

        self.advance(Stage::Rewriting);
        let redirect = self.client.redirect_target(catalog_url)?;
        let download = resolve_download(&redirect, self.mirror)?;

        if req.variant.is_server() {
            self.advance(Stage::PostProcessing);
        }
        let plan = Plan::for_variant(req.variant, download, self.env.home())?;

        if req.print_only {
            self.advance(Stage::PrintOnly);
            let url = plan.download().url.clone();
            writeln!(out, "{url}").context("Failed to write url")?;
            return Ok(Outcome::Printed(url));
        }

        match plan {
            Plan::Artifact(download) => {
                self.advance(Stage::Downloading);
                let (path, bytes) = self.fetch(&download, tracker)?;
                Ok(Outcome::Downloaded { path, bytes })
            }
            Plan::Server { download, target } => {
                if target.path.exists() {
                    return Err(RunError::InstallationAlreadyExists(target.path).into());
                }

                self.advance(Stage::Downloading);
                let (archive, bytes) = self.fetch(&download, tracker)?;

                self.advance(Stage::Extracting);
                install_tree(&archive, self.env.pwd(), SERVER_BUNDLE.top_level, &target.path)?;
                info!(commit = %target.commit, path = %target.path.display(), "server installed");
                Ok(Outcome::Installed {
                    target: target.path,
                    bytes,
                })
            }
        }
    }

    fn fetch<T, F>(&self, download: &ResolvedDownload, tracker: F) -> Result<(PathBuf, u64)>
    where
        T: Tracker<u64>,
        F: FnOnce(&str, Option<u64>) -> T,
    {
        let dest = self.env.pwd().join(&download.file_name);
        let body = self.client.open(&download.url)?;
        let tracker = tracker(&download.file_name, body.content_length());
        let bytes = download_to(body, &dest, tracker)?;
        Ok((dest, bytes))
    }
}
