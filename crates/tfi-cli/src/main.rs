use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tfi_core::{
    error_outcome, CommandContext, CommandInfo, ExecutionOutcome, GlobalOptions, SharedEffects,
    SystemEffects,
};

mod cli;
mod output;
mod style;

use cli::{CommandGroupCli, TfiCli};
use output::{emit_output, OutputOptions};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = TfiCli::parse();
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    let global = GlobalOptions { quiet: cli.quiet };

    let (info, outcome) = dispatch(&cli.command, &global);
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = emit_output(&opts, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn dispatch(command: &CommandGroupCli, global: &GlobalOptions) -> (CommandInfo, ExecutionOutcome) {
    let info = match command {
        CommandGroupCli::Install(_) => CommandInfo::new("install"),
        CommandGroupCli::Info => CommandInfo::new("info"),
    };
    let effects: SharedEffects = Arc::new(SystemEffects::new());
    let result = CommandContext::new(global, effects).and_then(|ctx| match command {
        CommandGroupCli::Install(args) => tfi_core::install(&ctx, &args.to_request()),
        CommandGroupCli::Info => tfi_core::info(&ctx),
    });
    (info, result.unwrap_or_else(error_outcome))
}

fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("tfi_core={level},tfi_domain={level},tfi_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
