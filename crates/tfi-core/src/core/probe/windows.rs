use std::path::PathBuf;

use tfi_domain::{Interpreter, PythonVersion};
use tracing::debug;

use super::query_interpreter;
use crate::CommandContext;

/// 64-bit interpreter of exactly `required` major.minor, from the `py`
/// launcher's registry view and then `PATH`.
pub(crate) fn find_interpreter(ctx: &CommandContext, required: PythonVersion) -> Option<Interpreter> {
    let mut candidates = launcher_interpreters(ctx);
    if let Some(on_path) = ctx.fs().which("python") {
        if !candidates.contains(&on_path) {
            candidates.push(on_path);
        }
    }
    candidates.into_iter().find_map(|path| {
        let details = match query_interpreter(ctx, &path) {
            Ok(details) => details,
            Err(err) => {
                debug!(python = %path.display(), error = %err, "skipping interpreter");
                return None;
            }
        };
        if details.version == required && details.pointer_width == 64 {
            Some(Interpreter::new(path, details.version))
        } else {
            debug!(
                python = %path.display(),
                version = %details.version,
                bits = details.pointer_width,
                "interpreter does not qualify"
            );
            None
        }
    })
}

fn launcher_interpreters(ctx: &CommandContext) -> Vec<PathBuf> {
    let Some(launcher) = ctx.fs().which("py") else {
        return Vec::new();
    };
    match ctx.runner().run(&launcher, &["-0p".to_string()], &[]) {
        Ok(output) if output.success() => parse_launcher_listing(&output.stdout),
        Ok(output) => {
            debug!(code = output.code, "py launcher listing failed");
            Vec::new()
        }
        Err(err) => {
            debug!(error = %err, "py launcher unavailable");
            Vec::new()
        }
    }
}

/// Paths from `py -0p`, which prints one ` -<tag> [*] <path>` row per install.
fn parse_launcher_listing(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if !line.starts_with('-') {
                return None;
            }
            let (_, rest) = line.split_once(char::is_whitespace)?;
            let path = rest
                .trim()
                .trim_start_matches('*')
                .trim_end_matches('*')
                .trim();
            path.to_ascii_lowercase()
                .ends_with(".exe")
                .then(|| PathBuf::from(path))
        })
        .collect()
}
