use anyhow::Result;
use serde_json::{json, Value};
use tfi_domain::{select_strategy, CondaLocator, InstallError, InstallMethod};

use crate::outcome::outcome_from_error;
use crate::probe::probe_tools;
use crate::{CommandContext, ExecutionOutcome};

/// Reports the platform, probed tools and the strategy `auto` would pick.
///
/// # Errors
/// Returns an error only for unexpected probe failures.
pub fn info(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    let platform = ctx.platform();
    let mut details = json!({
        "platform": {
            "os": platform.os,
            "pointer_width": platform.pointer_width,
            "supported": platform.validate().is_ok(),
        },
        "tools": Value::Null,
        "strategy": Value::Null,
        "blocked": Value::Null,
        "online": ctx.is_online(),
    });

    if let Err(err) = platform.validate() {
        details["blocked"] = blocked(&err);
        return Ok(ExecutionOutcome::success(
            format!("{} is not supported", describe(ctx)),
            details,
        ));
    }

    let tools = match probe_tools(ctx, InstallMethod::Auto, &CondaLocator::Auto) {
        Ok(tools) => tools,
        Err(err) => return outcome_from_error(err),
    };
    details["tools"] = serde_json::to_value(&tools)?;
    let message = match select_strategy(InstallMethod::Auto, platform, &tools, ctx.settings()) {
        Ok(strategy) => {
            details["strategy"] = serde_json::to_value(&strategy)?;
            format!("{}; auto would install with {}", describe(ctx), strategy.label())
        }
        Err(err) => {
            details["blocked"] = blocked(&err);
            format!("{}; no install strategy available", describe(ctx))
        }
    };
    Ok(ExecutionOutcome::success(message, details))
}

fn describe(ctx: &CommandContext) -> String {
    let platform = ctx.platform();
    format!("{} ({}-bit)", platform.os, platform.pointer_width)
}

fn blocked(err: &InstallError) -> Value {
    json!({
        "reason": err.reason(),
        "message": err.to_string(),
        "hint": err.hint(),
    })
}
