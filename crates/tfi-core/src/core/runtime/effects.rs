use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::process::{run_command, run_command_streaming, RunOutput};
use crate::core::releases::GithubReleaseIndex;

pub trait CommandRunner: Send + Sync {
    /// Runs a command and captures its output without echoing it.
    fn run(&self, program: &Path, args: &[String], env: &[(String, String)]) -> Result<RunOutput>;
    /// Runs a command while forwarding its output to the terminal.
    fn run_streaming(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<RunOutput>;
}

pub trait ReleaseIndex: Send + Sync {
    /// Release tags in the order the index publishes them.
    fn release_tags(&self, url: &str) -> Result<Vec<String>>;
}

pub trait FileSystem: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Looks an executable up on `PATH`.
    fn which(&self, name: &str) -> Option<PathBuf>;
}

pub trait Effects: Send + Sync {
    fn runner(&self) -> &dyn CommandRunner;
    fn releases(&self) -> &dyn ReleaseIndex;
    fn fs(&self) -> &dyn FileSystem;
}

pub struct SystemEffects {
    runner: Arc<SystemCommandRunner>,
    releases: Arc<GithubReleaseIndex>,
    fs: Arc<SystemFileSystem>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: Arc::new(SystemCommandRunner),
            releases: Arc::new(GithubReleaseIndex),
            fs: Arc::new(SystemFileSystem),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    fn releases(&self) -> &dyn ReleaseIndex {
        self.releases.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[String], env: &[(String, String)]) -> Result<RunOutput> {
        run_command(program, args, env)
    }

    fn run_streaming(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<RunOutput> {
        run_command_streaming(program, args, env)
    }
}

struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path).with_context(|| format!("removing dir {}", path.display()))
    }

    fn which(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

pub type SharedEffects = Arc<dyn Effects>;
