mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::config::context;
pub(crate) use crate::core::probe;
pub(crate) use crate::core::releases;
pub(crate) use crate::core::runtime::effects;
pub(crate) use crate::core::tooling::outcome;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{Config, GlobalOptions, NetworkConfig, PathConfig};
pub use crate::core::runtime::effects::{SharedEffects, SystemEffects};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::tooling::diagnostics::commands as diag_commands;
pub use crate::core::tooling::outcome::{
    error_outcome, format_status_message, install_error_outcome, to_json_response, CommandStatus,
    ExecutionOutcome, InstallUserError,
};

pub use crate::core::info::info;
pub use crate::core::install::install;
pub use crate::core::releases::resolve_version;

pub use tfi_domain::{CondaLocator, InstallMethod, InstallRequest};

pub(crate) const TFI_VERSION: &str = env!("CARGO_PKG_VERSION");
