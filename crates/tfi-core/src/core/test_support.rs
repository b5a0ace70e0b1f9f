//! In-memory effects for unit tests.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tfi_domain::{OsFamily, PlatformInfo};

use crate::config::settings::EnvSnapshot;
use crate::config::{Config, GlobalOptions};
use crate::effects::{CommandRunner, Effects, FileSystem, ReleaseIndex};
use crate::probe::INTERPRETER_QUERY;
use crate::{CommandContext, RunOutput};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) program: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) env: Vec<(String, String)>,
    pub(crate) streamed: bool,
}

impl RecordedCall {
    /// `file-name args...`, convenient for ordering assertions.
    pub(crate) fn command_line(&self) -> String {
        let name = self
            .program
            .file_name()
            .map_or_else(|| self.program.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });
        std::iter::once(name)
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct Script {
    program: PathBuf,
    args_prefix: Vec<String>,
    outputs: Vec<RunOutput>,
    served: usize,
}

impl Script {
    fn matches(&self, program: &Path, args: &[String]) -> bool {
        let program_matches = self.program == program
            || program.file_name().is_some_and(|name| self.program == Path::new(name));
        program_matches && args.starts_with(&self.args_prefix)
    }

    fn next_output(&mut self) -> RunOutput {
        let index = self.served.min(self.outputs.len().saturating_sub(1));
        self.served += 1;
        self.outputs.get(index).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
struct FakeRunner {
    calls: Mutex<Vec<RecordedCall>>,
    scripts: Mutex<Vec<Script>>,
}

impl FakeRunner {
    fn record(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
        streamed: bool,
    ) -> Result<RunOutput> {
        self.calls
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push(RecordedCall {
                program: program.to_path_buf(),
                args: args.to_vec(),
                env: env.to_vec(),
                streamed,
            });
        let mut scripts = self.scripts.lock().map_err(|_| anyhow!("poisoned"))?;
        Ok(scripts
            .iter_mut()
            .find(|script| script.matches(program, args))
            .map(Script::next_output)
            .unwrap_or_default())
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[String], env: &[(String, String)]) -> Result<RunOutput> {
        self.record(program, args, env, false)
    }

    fn run_streaming(
        &self,
        program: &Path,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<RunOutput> {
        self.record(program, args, env, true)
    }
}

#[derive(Default)]
struct FakeReleases {
    tags: Mutex<Vec<String>>,
    queries: Mutex<usize>,
}

impl ReleaseIndex for FakeReleases {
    fn release_tags(&self, _url: &str) -> Result<Vec<String>> {
        *self.queries.lock().map_err(|_| anyhow!("poisoned"))? += 1;
        Ok(self.tags.lock().map_err(|_| anyhow!("poisoned"))?.clone())
    }
}

#[derive(Default)]
struct FakeFs {
    files: Mutex<BTreeSet<PathBuf>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    on_path: Mutex<HashMap<String, PathBuf>>,
    removed: Mutex<Vec<PathBuf>>,
}

impl FileSystem for FakeFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().is_ok_and(|files| files.contains(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.dirs.lock().is_ok_and(|dirs| dirs.contains(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut dirs = self.dirs.lock().map_err(|_| anyhow!("poisoned"))?;
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.dirs
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .retain(|dir| !dir.starts_with(path));
        self.files
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .retain(|file| !file.starts_with(path));
        self.removed
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push(path.to_path_buf());
        Ok(())
    }

    fn which(&self, name: &str) -> Option<PathBuf> {
        self.on_path.lock().ok()?.get(name).cloned()
    }
}

/// Shared fake; clones observe the same recorded state.
#[derive(Clone)]
pub(crate) struct FakeEffects {
    platform: PlatformInfo,
    runner: Arc<FakeRunner>,
    releases: Arc<FakeReleases>,
    fs: Arc<FakeFs>,
}

impl FakeEffects {
    pub(crate) fn on(platform: PlatformInfo) -> Self {
        Self {
            platform,
            runner: Arc::default(),
            releases: Arc::default(),
            fs: Arc::default(),
        }
    }

    pub(crate) fn linux() -> Self {
        Self::on(PlatformInfo::new(OsFamily::Linux, 64))
    }

    pub(crate) fn macos() -> Self {
        Self::on(PlatformInfo::new(OsFamily::MacOs, 64))
    }

    pub(crate) fn windows() -> Self {
        Self::on(PlatformInfo::new(OsFamily::Windows, 64))
    }

    pub(crate) fn platform(&self) -> PlatformInfo {
        self.platform.clone()
    }

    pub(crate) fn with_tags(self, tags: &[&str]) -> Self {
        if let Ok(mut stored) = self.releases.tags.lock() {
            *stored = tags.iter().map(ToString::to_string).collect();
        }
        self
    }

    pub(crate) fn with_file(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut files) = self.fs.files.lock() {
            files.insert(path.as_ref().to_path_buf());
        }
        self
    }

    pub(crate) fn with_dir(self, path: impl AsRef<Path>) -> Self {
        let _ = self.fs.create_dir_all(path.as_ref());
        self
    }

    /// Makes `name` resolvable through `PATH` at `path`.
    pub(crate) fn with_on_path(self, name: &str, path: impl AsRef<Path>) -> Self {
        if let Ok(mut on_path) = self.fs.on_path.lock() {
            on_path.insert(name.to_string(), path.as_ref().to_path_buf());
        }
        self.with_file(path)
    }

    /// Scripts every invocation of `program` whose arguments start with `args`.
    pub(crate) fn with_outputs(self, program: &str, args: &[&str], outputs: Vec<RunOutput>) -> Self {
        if let Ok(mut scripts) = self.runner.scripts.lock() {
            scripts.push(Script {
                program: PathBuf::from(program),
                args_prefix: args.iter().map(ToString::to_string).collect(),
                outputs,
                served: 0,
            });
        }
        self
    }

    pub(crate) fn with_output(self, program: &str, args: &[&str], code: i32, stdout: &str) -> Self {
        self.with_outputs(program, args, vec![output(code, stdout)])
    }

    pub(crate) fn with_exit(self, program: &str, args: &[&str], code: i32) -> Self {
        self.with_output(program, args, code, "")
    }

    /// Registers an interpreter answering the version query with `answer`
    /// (`"3.5 64"`).
    pub(crate) fn with_interpreter(self, path: &str, answer: &str) -> Self {
        self.with_file(path)
            .with_output(path, &["-c", INTERPRETER_QUERY], 0, &format!("{answer}\n"))
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.runner
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }

    pub(crate) fn release_queries(&self) -> usize {
        self.releases.queries.lock().map(|count| *count).unwrap_or(0)
    }

    pub(crate) fn removed_dirs(&self) -> Vec<PathBuf> {
        self.fs
            .removed
            .lock()
            .map(|removed| removed.clone())
            .unwrap_or_default()
    }

    pub(crate) fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.fs
            .dirs
            .lock()
            .is_ok_and(|dirs| dirs.contains(path.as_ref()))
    }
}

impl Effects for FakeEffects {
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

pub(crate) fn output(code: i32, stdout: &str) -> RunOutput {
    RunOutput {
        code,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Owns what a `CommandContext` borrows.
pub(crate) struct TestContext {
    global: GlobalOptions,
    effects: FakeEffects,
    env: Vec<(String, String)>,
    home: Option<PathBuf>,
}

impl TestContext {
    pub(crate) fn new(effects: FakeEffects) -> Self {
        Self {
            global: GlobalOptions::default(),
            effects,
            env: Vec::new(),
            home: Some(PathBuf::from("/home/dev")),
        }
    }

    pub(crate) fn quiet(mut self) -> Self {
        self.global.quiet = true;
        self
    }

    pub(crate) fn with_env(mut self, pairs: &[(&str, &str)]) -> Self {
        self.env.extend(
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string())),
        );
        self
    }

    pub(crate) fn context(&self) -> CommandContext<'_> {
        let pairs: Vec<(&str, &str)> = self
            .env
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let config = Config::from_snapshot(&EnvSnapshot::testing(&pairs), self.home.clone())
            .expect("test config");
        CommandContext::from_parts(
            &self.global,
            config,
            self.effects.platform(),
            Arc::new(self.effects.clone()),
        )
    }
}
