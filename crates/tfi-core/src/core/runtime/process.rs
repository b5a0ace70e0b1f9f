use std::{
    io::{self, Read, Write},
    path::Path,
    process::{Command, Stdio},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};

/// Proxy variables that are dropped from the child when passed empty.
const PROXY_VARS: [&str; 8] = [
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
    "NO_PROXY",
    "no_proxy",
];

/// Per-stream capture bound; only the tail is kept beyond it.
const MAX_CAPTURE_BYTES: usize = 1024 * 1024;
const TRUNCATION_MARKER: &str = "\n[...truncated...]\n";

#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a program and capture stdout/stderr.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or the I/O streams cannot
/// be read entirely.
pub fn run_command(program: &Path, args: &[String], envs: &[(String, String)]) -> Result<RunOutput> {
    run_captured(program, args, envs, false)
}

/// Execute a program while echoing its output to our stderr.
///
/// pip and conda report download and build progress this way. Both streams go
/// to stderr so `--json` keeps stdout machine-readable.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or its output streams
/// cannot be read.
pub fn run_command_streaming(
    program: &Path,
    args: &[String],
    envs: &[(String, String)],
) -> Result<RunOutput> {
    run_captured(program, args, envs, true)
}

fn run_captured(
    program: &Path,
    args: &[String],
    envs: &[(String, String)],
    echo: bool,
) -> Result<RunOutput> {
    let mut command = configured_command(program, args, envs);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let display = program.display().to_string();
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {display}"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout missing for {display}"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr missing for {display}"))?;

    let stdout_reader = spawn_reader(stdout, echo, MAX_CAPTURE_BYTES);
    let stderr_reader = spawn_reader(stderr, echo, MAX_CAPTURE_BYTES);

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {display}"))?;
    Ok(RunOutput {
        code: status.code().unwrap_or(-1),
        stdout: join_reader(stdout_reader, "stdout")?,
        stderr: join_reader(stderr_reader, "stderr")?,
    })
}

fn spawn_reader(
    reader: impl Read + Send + 'static,
    echo: bool,
    limit: usize,
) -> JoinHandle<Result<String>> {
    thread::spawn(move || {
        if echo {
            capture_limited(reader, Some(io::stderr()), limit)
        } else {
            capture_limited(reader, None::<io::Stderr>, limit)
        }
    })
}

fn join_reader(handle: JoinHandle<Result<String>>, stream: &str) -> Result<String> {
    handle
        .join()
        .map_err(|_| anyhow!("{stream} reader thread panicked"))?
}

fn configured_command(program: &Path, args: &[String], envs: &[(String, String)]) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    for (key, value) in envs {
        if value.is_empty() && PROXY_VARS.contains(&key.as_str()) {
            command.env_remove(key);
        } else {
            command.env(key, value);
        }
    }
    command
}

/// Reads `reader` to the end, optionally copying every chunk to `echo`, and
/// keeps at most `limit` bytes.
fn capture_limited(
    mut reader: impl Read,
    mut echo: Option<impl Write>,
    limit: usize,
) -> Result<String> {
    let mut buffer = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        if let Some(out) = echo.as_mut() {
            out.write_all(&chunk[..read])?;
        }
        append_limited(&mut buffer, &chunk[..read], limit, &mut truncated);
    }
    if let Some(out) = echo.as_mut() {
        out.flush().ok();
    }
    let mut text = String::from_utf8_lossy(&buffer).into_owned();
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    Ok(text)
}

// Keeps the tail: pip prints the failure reason last.
fn append_limited(buffer: &mut Vec<u8>, chunk: &[u8], limit: usize, truncated: &mut bool) {
    if limit == 0 {
        return;
    }
    if buffer.len() + chunk.len() <= limit {
        buffer.extend_from_slice(chunk);
        return;
    }
    *truncated = true;
    if chunk.len() >= limit {
        buffer.clear();
        buffer.extend_from_slice(&chunk[chunk.len() - limit..]);
    } else {
        let excess = buffer.len() + chunk.len() - limit;
        buffer.drain(..excess);
        buffer.extend_from_slice(chunk);
    }
}
