use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tfi_domain::{CondaLocator, InstallMethod, InstallRequest, LATEST};

pub const TFI_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const TFI_BEFORE_HELP: &str = concat!(
    "tfi ",
    env!("CARGO_PKG_VERSION"),
    " – TensorFlow environment installer\n\n",
    "  install          Create or reuse an environment and install TensorFlow into it.\n",
    "  info             Show the platform, detected tools and the strategy auto would use.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "tfi",
    author,
    version,
    disable_help_subcommand = true,
    before_help = TFI_BEFORE_HELP,
    help_template = TFI_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct TfiCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(
        about = "Install TensorFlow and its companion packages.",
        override_usage = "tfi install [--method METHOD] [--version VERSION] [--gpu] [--package-url URL]",
        after_help = "Examples:\n  tfi install\n  tfi install --method virtualenv --version 1.1.0\n  tfi install --method conda --gpu --conda ~/miniconda3/bin/conda"
    )]
    Install(InstallArgs),
    #[command(about = "Report the platform, detected tools and the strategy auto would use.")]
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Pick the best strategy for this host
    Auto,
    /// Named conda environment
    #[value(alias = "managed-env")]
    Conda,
    /// Fresh virtualenv under WORKON_HOME (macOS and Linux)
    #[value(alias = "virtual-env")]
    Virtualenv,
    /// The interpreter's own site-packages (Windows only)
    System,
}

impl From<MethodArg> for InstallMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Auto => Self::Auto,
            MethodArg::Conda => Self::ManagedEnv,
            MethodArg::Virtualenv => Self::VirtualEnv,
            MethodArg::System => Self::System,
        }
    }
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[arg(long, value_enum, default_value_t = MethodArg::Auto, help = "Installation strategy")]
    pub method: MethodArg,
    #[arg(
        long,
        value_name = "VERSION",
        default_value = LATEST,
        help = "Release to install, `latest` or major.minor.patch"
    )]
    pub version: String,
    #[arg(long, help = "Install the GPU build")]
    pub gpu: bool,
    #[arg(
        long,
        value_name = "URL",
        help = "Install this wheel or requirement instead of the derived one"
    )]
    pub package_url: Option<String>,
    #[arg(
        long,
        value_name = "PATH",
        help = "conda binary to use, or `auto` to search (defaults to TFI_CONDA)"
    )]
    pub conda: Option<String>,
}

impl InstallArgs {
    pub fn to_request(&self) -> InstallRequest {
        InstallRequest {
            method: self.method.into(),
            version: self.version.clone(),
            gpu: self.gpu,
            package_url: self.package_url.clone(),
            conda: self
                .conda
                .as_deref()
                .map_or(CondaLocator::Auto, CondaLocator::parse),
        }
    }
}
