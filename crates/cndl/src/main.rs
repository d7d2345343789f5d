use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cndl_fetch::{ProgressTrackerBuilder, TrackerBuilder};
use tracing::{debug, info};

use crate::cli::App;
use crate::env::CndlEnv;
use crate::run::{Outcome, Runner};

mod cli;
mod env;
mod logging;
mod run;

fn main() -> ExitCode {
    let app = App::parse();
    logging::init(app.verbose);

    match try_main(&app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(app: &App) -> Result<()> {
    let env = CndlEnv::new()?;
    let client = app
        .client_setting()
        .build()
        .context("Failed to build HTTP client")?;

    let mut stdout = io::stdout().lock();
    let mut runner = Runner::new(&client, &env);
    let outcome = runner.run(&app.request(), &mut stdout, |name, len| {
        ProgressTrackerBuilder::default()
            .with_len(len)
            .with_prefix(name)
            .build()
    });
    debug!(stage = %runner.stage(), "finished");

    match outcome? {
        Outcome::Printed(url) => debug!(%url, "printed"),
        Outcome::Downloaded { path, bytes } => info!(path = %path.display(), bytes, "saved"),
        Outcome::Installed { target, bytes } => {
            info!(target = %target.display(), bytes, "server bundle installed")
        }
    }
    Ok(())
}
