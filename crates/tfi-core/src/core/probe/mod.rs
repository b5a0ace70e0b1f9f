//! Host inspection: platform detection and discovery of the external tools
//! an installation strategy needs.

mod conda;
mod windows;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tfi_domain::{
    CondaLocator, InstallError, InstallMethod, Interpreter, OsFamily, PlatformInfo, PythonVersion,
    ToolAvailability,
};
use tracing::debug;

use crate::CommandContext;

pub(crate) use conda::locate_conda;

/// Directories searched before `PATH` on macOS and Linux.
pub(crate) const UNIX_SEARCH_DIRS: [&str; 3] = ["/usr/local/bin", "/usr/bin", "/opt/local/bin"];

const UNIX_PYTHON_NAMES: [&str; 2] = ["python", "python3"];

/// Prints `major.minor pointer-bits` for the interpreter running it.
pub(crate) const INTERPRETER_QUERY: &str =
    "import sys, struct; print('%d.%d %d' % (sys.version_info[0], sys.version_info[1], struct.calcsize('P') * 8))";

/// Platform of the running binary. Validation happens later.
#[must_use]
pub(crate) fn detect_platform() -> PlatformInfo {
    let bits = u32::try_from(std::mem::size_of::<usize>() * 8).unwrap_or(0);
    PlatformInfo::new(OsFamily::from_target(std::env::consts::OS), bits)
}

/// First `dir/name` that is a file, trying every directory per name, then
/// falling back to a `PATH` lookup. Never errors.
pub(crate) fn find_executable(ctx: &CommandContext, names: &[&str], dirs: &[&str]) -> Option<PathBuf> {
    let fs = ctx.fs();
    for name in names {
        for dir in dirs {
            let candidate = Path::new(dir).join(name);
            if fs.is_file(&candidate) {
                return Some(candidate);
            }
        }
    }
    names.iter().find_map(|name| fs.which(name))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InterpreterDetails {
    pub(crate) version: PythonVersion,
    pub(crate) pointer_width: u32,
}

/// Asks an interpreter for its version and pointer width.
///
/// # Errors
/// Returns `Subprocess` when the interpreter exits non-zero and
/// `VersionParse` when its answer cannot be parsed.
pub(crate) fn query_interpreter(ctx: &CommandContext, python: &Path) -> Result<InterpreterDetails> {
    let args = vec!["-c".to_string(), INTERPRETER_QUERY.to_string()];
    let output = ctx.runner().run(python, &args, &[])?;
    if !output.success() {
        return Err(InstallError::subprocess("python version query", output.code).into());
    }
    parse_interpreter_details(&output.stdout).ok_or_else(|| {
        InstallError::VersionParse {
            input: output.stdout.trim().to_string(),
            reason: format!("unexpected answer from {}", python.display()),
        }
        .into()
    })
}

fn parse_interpreter_details(stdout: &str) -> Option<InterpreterDetails> {
    let line = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    let (version, width) = line.split_once(' ')?;
    Some(InterpreterDetails {
        version: version.parse().ok()?,
        pointer_width: width.trim().parse().ok()?,
    })
}

/// Probes the tools the requested method could use.
///
/// # Errors
/// Returns `MissingTool` when an explicit conda path does not exist.
pub(crate) fn probe_tools(
    ctx: &CommandContext,
    method: InstallMethod,
    conda: &CondaLocator,
) -> Result<ToolAvailability> {
    let mut tools = ToolAvailability::default();
    match ctx.platform().os {
        OsFamily::Windows => {
            if method != InstallMethod::ManagedEnv {
                tools.python = windows::find_interpreter(ctx, ctx.settings().windows_python);
            }
            if method != InstallMethod::System {
                tools.conda = locate_conda(ctx, conda)?;
            }
        }
        OsFamily::MacOs | OsFamily::Linux => {
            if method != InstallMethod::ManagedEnv {
                tools.python = unix_interpreter(ctx);
                let pip_name = tools
                    .python
                    .as_ref()
                    .map_or("pip", Interpreter::pip_variant);
                tools.pip = find_executable(ctx, &[pip_name], &UNIX_SEARCH_DIRS);
                tools.virtualenv = find_executable(ctx, &["virtualenv"], &UNIX_SEARCH_DIRS);
            }
            tools.conda = locate_conda(ctx, conda)?;
        }
        OsFamily::Other(_) => {}
    }
    debug!(
        python = ?tools.python.as_ref().map(|py| py.path.display().to_string()),
        pip = ?tools.pip,
        virtualenv = ?tools.virtualenv,
        conda = ?tools.conda,
        "probed tools"
    );
    Ok(tools)
}

fn unix_interpreter(ctx: &CommandContext) -> Option<Interpreter> {
    let path = find_executable(ctx, &UNIX_PYTHON_NAMES, &UNIX_SEARCH_DIRS)?;
    match query_interpreter(ctx, &path) {
        Ok(details) => Some(Interpreter::new(path, details.version)),
        Err(err) => {
            debug!(python = %path.display(), error = %err, "ignoring unusable interpreter");
            None
        }
    }
}
