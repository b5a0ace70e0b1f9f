use atty::Stream;
use color_eyre::Result;
use serde_json::Value;
use tfi_core::{diag_commands, CommandInfo, CommandStatus, ExecutionOutcome};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(opts: &OutputOptions, info: CommandInfo, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.exit_code();
    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = tfi_core::to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if outcome.status == CommandStatus::Ok {
        if !opts.quiet {
            let message = tfi_core::format_status_message(info, &outcome.message);
            println!("{}", style.status(&outcome.status, &message));
            for package in packages_from_details(&outcome.details) {
                println!("  • {package}");
            }
            if let Some(hint) = blocked_hint(&outcome.details) {
                println!("{}", style.info(&format!("Tip: {hint}")));
            }
        }
    } else {
        for line in failure_lines(&style, info, outcome) {
            eprintln!("{line}");
        }
    }

    Ok(code)
}

fn failure_lines(style: &Style, info: CommandInfo, outcome: &ExecutionOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    let header = format!(
        "{}  {}",
        error_code(info),
        tfi_core::format_status_message(info, &outcome.message)
    );
    lines.push(style.error_header(&header));
    lines.push(String::new());
    lines.push("Why:".to_string());
    for reason in collect_why_bullets(&outcome.details, &outcome.message) {
        lines.push(format!("  • {reason}"));
    }
    lines.push(String::new());
    lines.push("Fix:".to_string());
    for fix in collect_fix_bullets(&outcome.details) {
        lines.push(style.fix_bullet(&format!("  • {fix}")));
    }
    lines
}

fn error_code(info: CommandInfo) -> &'static str {
    match info.name {
        "install" => diag_commands::INSTALL,
        "info" => diag_commands::INFO,
        _ => diag_commands::GENERIC,
    }
}

fn packages_from_details(details: &Value) -> Vec<&str> {
    details
        .get("packages")
        .and_then(Value::as_array)
        .map(|packages| packages.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn blocked_hint(details: &Value) -> Option<&str> {
    details
        .get("blocked")
        .and_then(|blocked| blocked.get("hint"))
        .and_then(Value::as_str)
}

fn collect_why_bullets(details: &Value, fallback: &str) -> Vec<String> {
    let mut bullets = Vec::new();
    if let Some(reason) = details.get("reason").and_then(Value::as_str) {
        push_unique(
            &mut bullets,
            reason_display(reason).unwrap_or(reason).to_string(),
        );
    }
    if let Some(variable) = details.get("variable").and_then(Value::as_str) {
        push_unique(&mut bullets, format!("Check the value of {variable}"));
    }
    if let Some(tool) = details.get("tool").and_then(Value::as_str) {
        push_unique(&mut bullets, format!("Not found: {tool}"));
    }
    if let (Some(method), Some(os)) = (
        details.get("method").and_then(Value::as_str),
        details.get("os").and_then(Value::as_str),
    ) {
        push_unique(&mut bullets, format!("`{method}` cannot be used on {os}"));
    }
    if let Some(step) = details.get("step").and_then(Value::as_str) {
        let code = details.get("code").and_then(Value::as_i64).unwrap_or(-1);
        push_unique(&mut bullets, format!("`{step}` exited with code {code}"));
    }
    if bullets.is_empty() {
        bullets.push(fallback.to_string());
    }
    bullets
}

fn collect_fix_bullets(details: &Value) -> Vec<String> {
    let mut fixes = Vec::new();
    if let Some(hint) = details.get("hint").and_then(Value::as_str) {
        for line in hint.lines() {
            push_unique(&mut fixes, line.trim());
        }
    }
    if fixes.is_empty() {
        fixes.push("Re-run with -v for the commands tfi ran, or see `tfi install --help`.".to_string());
    }
    fixes
}

fn push_unique(vec: &mut Vec<String>, text: impl Into<String>) {
    let entry = text.into();
    if entry.trim().is_empty() {
        return;
    }
    if !vec.iter().any(|existing| existing == &entry) {
        vec.push(entry);
    }
}

fn reason_display(code: &str) -> Option<&'static str> {
    match code {
        "unsupported_platform" => Some("This host cannot run TensorFlow wheels."),
        "invalid_method" => Some("The requested method is not available on this operating system."),
        "missing_tool" => Some("A tool the installation needs was not found."),
        "version_parse" => Some("No release tag of the form vX.Y.Z was found."),
        "subprocess_failed" => Some("An installer step failed."),
        "offline" => Some("Network access is disabled (TFI_ONLINE=0)."),
        "invalid_config" => Some("An environment override holds an unusable value."),
        "unexpected" => Some("tfi hit an error it could not classify."),
        _ => None,
    }
}
