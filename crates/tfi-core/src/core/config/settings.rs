use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use tfi_domain::{InstallSettings, PythonVersion};

use crate::outcome::InstallUserError;

fn invalid_config(message: String, variable: &str, hint: String) -> anyhow::Error {
    InstallUserError::new(
        message,
        json!({
            "reason": "invalid_config",
            "variable": variable,
            "hint": hint,
        }),
    )
    .into()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOptions {
    /// Capture installer output instead of echoing it.
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like `var`, but blank values count as unset.
    pub(crate) fn non_empty(&self, key: &str) -> Option<&str> {
        self.var(key).map(str::trim).filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug)]
pub struct Config {
    pub(crate) network: NetworkConfig,
    pub(crate) paths: PathConfig,
    pub(crate) conda: Option<String>,
    pub(crate) install: InstallSettings,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    ///
    /// # Errors
    /// Returns an error if an override variable holds an unusable value.
    pub fn from_env() -> Result<Self> {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot, dirs_next::home_dir())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, home: Option<PathBuf>) -> Result<Self> {
        let mut install = InstallSettings::default();
        if let Some(name) = snapshot.non_empty("TFI_ENV_NAME") {
            install.env_name = name.to_string();
        }
        if let Some(url) = snapshot.non_empty("TFI_RELEASES_URL") {
            install.releases_url = url.to_string();
        }
        if let Some(template) = snapshot.non_empty("TFI_WHEEL_URL_TEMPLATE") {
            install.wheel_url_template = template.to_string();
        }
        if let Some(python) = snapshot.non_empty("TFI_CONDA_PYTHON") {
            install.conda_python = python.to_string();
        }
        if let Some(raw) = snapshot.non_empty("TFI_WINDOWS_PYTHON") {
            install.windows_python = raw.parse::<PythonVersion>().map_err(|err| {
                invalid_config(
                    format!("TFI_WINDOWS_PYTHON={raw} is not a Python version ({err})"),
                    "TFI_WINDOWS_PYTHON",
                    "set TFI_WINDOWS_PYTHON to major.minor, for example 3.5".to_string(),
                )
            })?;
        }

        let virtualenv_root = snapshot
            .non_empty("WORKON_HOME")
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|home| home.join(".virtualenvs")));

        Ok(Self {
            network: NetworkConfig {
                online: match snapshot.var("TFI_ONLINE") {
                    Some(value) => {
                        let lowered = value.to_ascii_lowercase();
                        !matches!(lowered.as_str(), "0" | "false" | "no" | "off" | "")
                    }
                    None => true,
                },
            },
            paths: PathConfig {
                home,
                virtualenv_root,
                search_path: snapshot.var("PATH").map(ToOwned::to_owned),
            },
            conda: snapshot.non_empty("TFI_CONDA").map(ToOwned::to_owned),
            install,
        })
    }

    #[must_use]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    #[must_use]
    pub fn paths(&self) -> &PathConfig {
        &self.paths
    }

    #[must_use]
    pub fn install(&self) -> &InstallSettings {
        &self.install
    }

    /// Conda locator used when the command line does not name one.
    #[must_use]
    pub fn default_conda(&self) -> Option<&str> {
        self.conda.as_deref()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub online: bool,
}

#[derive(Debug, Clone)]
pub struct PathConfig {
    pub home: Option<PathBuf>,
    pub virtualenv_root: Option<PathBuf>,
    /// `PATH` at startup, extended when activating a virtualenv.
    pub search_path: Option<String>,
}

impl PathConfig {
    /// # Errors
    /// Returns an error when neither `WORKON_HOME` nor a home directory is known.
    pub fn virtualenv_root(&self) -> Result<PathBuf> {
        self.virtualenv_root.clone().ok_or_else(|| {
            invalid_config(
                "home directory not found; set WORKON_HOME".to_string(),
                "WORKON_HOME",
                "export WORKON_HOME=<directory for virtualenvs>".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfi_domain::DEFAULT_ENV_NAME;

    #[test]
    fn defaults_are_online_with_home_virtualenvs() -> Result<()> {
        let snapshot = EnvSnapshot::testing(&[]);
        let config = Config::from_snapshot(&snapshot, Some(PathBuf::from("/home/dev")))?;
        assert!(config.network().online);
        assert_eq!(
            config.paths().virtualenv_root()?,
            PathBuf::from("/home/dev/.virtualenvs")
        );
        assert_eq!(config.install().env_name, DEFAULT_ENV_NAME);
        assert!(config.default_conda().is_none());
        Ok(())
    }

    #[test]
    fn workon_home_overrides_virtualenv_root() -> Result<()> {
        let snapshot = EnvSnapshot::testing(&[("WORKON_HOME", "/srv/envs")]);
        let config = Config::from_snapshot(&snapshot, None)?;
        assert_eq!(config.paths().virtualenv_root()?, PathBuf::from("/srv/envs"));
        Ok(())
    }

    #[test]
    fn missing_home_without_workon_home_is_reported() -> Result<()> {
        let config = Config::from_snapshot(&EnvSnapshot::testing(&[]), None)?;
        let err = config.paths().virtualenv_root().expect_err("no root");
        assert!(err.to_string().contains("WORKON_HOME"));
        Ok(())
    }

    #[test]
    fn offline_flag_accepts_common_spellings() -> Result<()> {
        for value in ["0", "false", "OFF", "no", ""] {
            let snapshot = EnvSnapshot::testing(&[("TFI_ONLINE", value)]);
            let config = Config::from_snapshot(&snapshot, None)?;
            assert!(!config.network().online, "{value:?} should disable network");
        }
        let snapshot = EnvSnapshot::testing(&[("TFI_ONLINE", "1")]);
        assert!(Config::from_snapshot(&snapshot, None)?.network().online);
        Ok(())
    }

    #[test]
    fn install_overrides_are_applied() -> Result<()> {
        let snapshot = EnvSnapshot::testing(&[
            ("TFI_ENV_NAME", "tf-test"),
            ("TFI_RELEASES_URL", "http://127.0.0.1:9/releases"),
            ("TFI_WINDOWS_PYTHON", "3.6"),
            ("TFI_CONDA", " /opt/conda/bin/conda "),
        ]);
        let config = Config::from_snapshot(&snapshot, None)?;
        assert_eq!(config.install().env_name, "tf-test");
        assert_eq!(config.install().releases_url, "http://127.0.0.1:9/releases");
        assert_eq!(config.install().windows_python, PythonVersion::new(3, 6));
        assert_eq!(config.default_conda(), Some("/opt/conda/bin/conda"));
        Ok(())
    }

    #[test]
    fn invalid_windows_python_is_rejected() {
        let snapshot = EnvSnapshot::testing(&[("TFI_WINDOWS_PYTHON", "three")]);
        let err = Config::from_snapshot(&snapshot, None).expect_err("invalid");
        assert!(format!("{err:#}").contains("TFI_WINDOWS_PYTHON"));
        let user = err.downcast::<InstallUserError>().expect("user error");
        assert_eq!(user.details()["reason"], "invalid_config");
    }
}
