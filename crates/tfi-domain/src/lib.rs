//! Pure installation model: platforms, requests, strategy selection, version
//! tokens, wheel naming and package lists. Nothing in this crate touches the
//! filesystem, the network or child processes.

mod error;
mod packages;
mod platform;
mod request;
mod settings;
pub mod strategy;
mod version;
mod wheel;

pub use error::InstallError;
pub use packages::{companion_packages, package_list, primary_spec, PrimarySource};
pub use platform::{OsFamily, PlatformInfo, PythonVersion};
pub use request::{is_latest, CondaLocator, InstallMethod, InstallRequest, AUTO_LOCATOR, LATEST};
pub use settings::{
    InstallSettings, DEFAULT_COMPANIONS, DEFAULT_ENV_NAME, DEFAULT_NATIVE_COMPANION,
    DEFAULT_RELEASES_URL, DEFAULT_WHEEL_URL_TEMPLATE,
};
pub use strategy::{
    pip_variant, select_strategy, validate_method, Interpreter, Strategy, ToolAvailability,
};
pub use version::{is_release_triplet, latest_from_tags, release_from_tag, ResolvedVersion};
pub use wheel::{abi_tag, wheel_url, WheelSegments};
