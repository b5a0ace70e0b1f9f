#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;

/// `tfi` with the network disabled and no conda override inherited.
pub fn tfi() -> Command {
    let mut cmd = cargo_bin_cmd!("tfi");
    cmd.env("TFI_ONLINE", "0")
        .env("NO_COLOR", "1")
        .env_remove("TFI_CONDA");
    cmd
}

pub fn parse_json(assert: &Assert) -> Value {
    let stdout = &assert.get_output().stdout;
    serde_json::from_slice(stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(stdout)
        )
    })
}

pub fn stderr_text(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}
