use anyhow::{Context, Result};
use home::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct CndlEnv {
    home: Option<PathBuf>,
    pwd: PathBuf,
}

impl CndlEnv {
    pub fn new() -> Result<Self> {
        let pwd = env::current_dir().context("Failed to get current directory")?;

        // Only the server install needs a home; report its absence there.
        Ok(Self::from_paths(home_dir(), pwd))
    }

    pub fn from_paths(home: Option<PathBuf>, pwd: PathBuf) -> Self {
        Self { home, pwd }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn pwd(&self) -> &Path {
        &self.pwd
    }
}
