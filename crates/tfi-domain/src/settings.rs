use serde::Serialize;

use crate::PythonVersion;

pub const DEFAULT_ENV_NAME: &str = "tfi-env";
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/tensorflow/tensorflow/releases";
pub const DEFAULT_WHEEL_URL_TEMPLATE: &str = "https://storage.googleapis.com/tensorflow/{platform}/{accelerator}/{package}-{version}-{abi}-{arch}.whl";
pub const DEFAULT_COMPANIONS: [&str; 4] = ["h5py", "pyyaml", "requests", "Pillow"];
pub const DEFAULT_NATIVE_COMPANION: &str = "scipy";

/// Named values the installers consume instead of inline literals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstallSettings {
    /// Name shared by the conda environment and the virtualenv directory.
    pub env_name: String,
    pub package: String,
    pub gpu_package: String,
    pub companions: Vec<String>,
    /// Companion that needs a compiler toolchain when no binary is available.
    pub native_companion: String,
    pub wheel_url_template: String,
    pub releases_url: String,
    /// Interpreter requested when creating a fresh conda environment.
    pub conda_python: String,
    /// The only interpreter line accepted for Windows system installs.
    pub windows_python: PythonVersion,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            env_name: DEFAULT_ENV_NAME.to_string(),
            package: "tensorflow".to_string(),
            gpu_package: "tensorflow-gpu".to_string(),
            companions: DEFAULT_COMPANIONS.iter().map(ToString::to_string).collect(),
            native_companion: DEFAULT_NATIVE_COMPANION.to_string(),
            wheel_url_template: DEFAULT_WHEEL_URL_TEMPLATE.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            conda_python: "3.6".to_string(),
            windows_python: PythonVersion::new(3, 5),
        }
    }
}

impl InstallSettings {
    #[must_use]
    pub fn package_name(&self, gpu: bool) -> &str {
        if gpu {
            &self.gpu_package
        } else {
            &self.package
        }
    }
}
