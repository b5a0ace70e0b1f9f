//! Picks exactly one installation strategy from the request and probe results.
//!
//! Everything here is a pure function of its inputs so each branch of the
//! decision tree can be checked without spawning processes.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::{InstallError, InstallMethod, InstallSettings, OsFamily, PlatformInfo, PythonVersion};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Interpreter {
    pub path: PathBuf,
    pub version: PythonVersion,
}

impl Interpreter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, version: PythonVersion) -> Self {
        Self {
            path: path.into(),
            version,
        }
    }

    /// `pip` for Python 2, `pip3` otherwise.
    #[must_use]
    pub fn pip_variant(&self) -> &'static str {
        pip_variant(self.version)
    }
}

#[must_use]
pub fn pip_variant(version: PythonVersion) -> &'static str {
    if version.major >= 3 {
        "pip3"
    } else {
        "pip"
    }
}

/// Probe results. On Windows `python` only holds a qualifying 64-bit interpreter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ToolAvailability {
    pub python: Option<Interpreter>,
    pub pip: Option<PathBuf>,
    pub virtualenv: Option<PathBuf>,
    pub conda: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum Strategy {
    ManagedEnv {
        conda: PathBuf,
    },
    VirtualEnv {
        python: Interpreter,
        pip: PathBuf,
        virtualenv: PathBuf,
    },
    System {
        python: Interpreter,
    },
}

impl Strategy {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ManagedEnv { .. } => "conda",
            Self::VirtualEnv { .. } => "virtualenv",
            Self::System { .. } => "system",
        }
    }

    /// Whether companions needing a compiler toolchain may be installed.
    #[must_use]
    pub fn allows_native_builds(&self) -> bool {
        !matches!(self, Self::System { .. })
    }
}

/// Platform and method checks that need no probing.
///
/// # Errors
/// Returns `UnsupportedPlatform` or `InvalidMethod`.
pub fn validate_method(method: InstallMethod, platform: &PlatformInfo) -> Result<(), InstallError> {
    platform.validate()?;
    match method_conflict(method, &platform.os) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn method_conflict(method: InstallMethod, os: &OsFamily) -> Option<InstallError> {
    let hint = match (os, method) {
        (OsFamily::Windows, InstallMethod::VirtualEnv) => {
            "use `--method conda` or `--method system` on Windows"
        }
        (OsFamily::MacOs | OsFamily::Linux, InstallMethod::System) => {
            "use `--method virtualenv` or `--method conda` on macOS and Linux"
        }
        _ => return None,
    };
    Some(InstallError::InvalidMethod {
        method: method.to_string(),
        os: os.to_string(),
        hint: hint.to_string(),
    })
}

/// Decides how to install.
///
/// # Errors
/// Returns an `InstallError` describing why no strategy applies.
pub fn select_strategy(
    method: InstallMethod,
    platform: &PlatformInfo,
    tools: &ToolAvailability,
    settings: &InstallSettings,
) -> Result<Strategy, InstallError> {
    validate_method(method, platform)?;
    match &platform.os {
        OsFamily::Windows => select_windows(method, tools, settings),
        os @ (OsFamily::MacOs | OsFamily::Linux) => select_unix(method, os, tools),
        OsFamily::Other(_) => Err(platform
            .validate()
            .err()
            .unwrap_or_else(|| unsupported_os(&platform.os))),
    }
}

fn unsupported_os(os: &OsFamily) -> InstallError {
    InstallError::UnsupportedPlatform {
        reason: format!("unsupported platform `{os}`"),
        hint: None,
    }
}

fn select_unix(
    method: InstallMethod,
    os: &OsFamily,
    tools: &ToolAvailability,
) -> Result<Strategy, InstallError> {
    if method == InstallMethod::ManagedEnv {
        return require_conda(tools);
    }

    let mut missing = Vec::new();
    if tools.python.is_none() {
        missing.push("python");
    }
    let pip_name = tools.python.as_ref().map_or("pip", Interpreter::pip_variant);
    if tools.pip.is_none() {
        missing.push(pip_name);
    }
    if tools.virtualenv.is_none() {
        missing.push("virtualenv");
    }

    match (&tools.python, &tools.pip, &tools.virtualenv) {
        (Some(python), Some(pip), Some(virtualenv)) => Ok(Strategy::VirtualEnv {
            python: python.clone(),
            pip: pip.clone(),
            virtualenv: virtualenv.clone(),
        }),
        _ => {
            if let Some(conda) = &tools.conda {
                debug!(
                    missing = %missing.join(", "),
                    conda = %conda.display(),
                    "virtualenv prerequisites missing; using conda"
                );
                return Ok(Strategy::ManagedEnv {
                    conda: conda.clone(),
                });
            }
            Err(InstallError::missing_tool(
                missing.join(", "),
                unix_prerequisites_hint(os, tools.python.as_ref().map(|py| py.version)),
            ))
        }
    }
}

fn select_windows(
    method: InstallMethod,
    tools: &ToolAvailability,
    settings: &InstallSettings,
) -> Result<Strategy, InstallError> {
    match method {
        InstallMethod::Auto => match (&tools.conda, &tools.python) {
            (Some(conda), _) => Ok(Strategy::ManagedEnv {
                conda: conda.clone(),
            }),
            (None, Some(python)) => Ok(Strategy::System {
                python: python.clone(),
            }),
            (None, None) => Err(missing_windows_python(settings)),
        },
        InstallMethod::ManagedEnv => require_conda(tools),
        InstallMethod::System => tools
            .python
            .clone()
            .map(|python| Strategy::System { python })
            .ok_or_else(|| missing_windows_python(settings)),
        InstallMethod::VirtualEnv => Err(method_conflict(method, &OsFamily::Windows)
            .unwrap_or_else(|| unsupported_os(&OsFamily::Windows))),
    }
}

fn require_conda(tools: &ToolAvailability) -> Result<Strategy, InstallError> {
    tools
        .conda
        .clone()
        .map(|conda| Strategy::ManagedEnv { conda })
        .ok_or_else(|| {
            InstallError::missing_tool(
                "conda",
                "install Anaconda or Miniconda (https://docs.conda.io/en/latest/miniconda.html) \
                 or point tfi at an existing binary with `--conda /path/to/conda`",
            )
        })
}

fn missing_windows_python(settings: &InstallSettings) -> InstallError {
    let required = settings.windows_python;
    InstallError::missing_tool(
        format!("64-bit Python {required}"),
        format!(
            "Installing TensorFlow requires a 64-bit version of Python {required}. \
             Install one of:\n\
             - Anaconda Python (recommended): https://www.anaconda.com/download/#windows\n\
             - Python Software Foundation: https://www.python.org/downloads/windows/"
        ),
    )
}

/// Shell commands that install the virtualenv prerequisites on this OS.
#[must_use]
pub fn unix_prerequisites_hint(os: &OsFamily, python: Option<PythonVersion>) -> String {
    let python3 = python.map_or(true, |version| version.major >= 3);
    let commands = match os {
        OsFamily::MacOs => {
            let pip = if python3 { "pip3" } else { "pip" };
            format!(
                "$ sudo /usr/bin/easy_install pip\n$ sudo /usr/local/bin/{pip} install --upgrade virtualenv"
            )
        }
        _ => {
            if python3 {
                "$ sudo apt-get install python3 python3-pip python3-virtualenv".to_string()
            } else {
                "$ sudo apt-get install python-pip python-virtualenv".to_string()
            }
        }
    };
    format!(
        "Installing TensorFlow requires python, pip and virtualenv. Install them with:\n\n{commands}\n\n\
         Alternatively install Anaconda or Miniconda and re-run with `--method conda`."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> PlatformInfo {
        PlatformInfo::new(OsFamily::Linux, 64)
    }

    fn windows() -> PlatformInfo {
        PlatformInfo::new(OsFamily::Windows, 64)
    }

    fn python3() -> Interpreter {
        Interpreter::new("/usr/bin/python", PythonVersion::new(3, 5))
    }

    fn full_unix_tools() -> ToolAvailability {
        ToolAvailability {
            python: Some(python3()),
            pip: Some(PathBuf::from("/usr/bin/pip3")),
            virtualenv: Some(PathBuf::from("/usr/bin/virtualenv")),
            conda: None,
        }
    }

    fn conda_only() -> ToolAvailability {
        ToolAvailability {
            conda: Some(PathBuf::from("/opt/conda/bin/conda")),
            ..ToolAvailability::default()
        }
    }

    fn select(
        method: InstallMethod,
        platform: &PlatformInfo,
        tools: &ToolAvailability,
    ) -> Result<Strategy, InstallError> {
        select_strategy(method, platform, tools, &InstallSettings::default())
    }

    #[test]
    fn unsupported_platforms_reject_every_method() {
        let platforms = [
            PlatformInfo::new(OsFamily::Other("solaris".into()), 64),
            PlatformInfo::new(OsFamily::Linux, 32),
            PlatformInfo::new(OsFamily::Windows, 32),
        ];
        for platform in &platforms {
            for method in [
                InstallMethod::Auto,
                InstallMethod::ManagedEnv,
                InstallMethod::VirtualEnv,
                InstallMethod::System,
            ] {
                let err = select(method, platform, &full_unix_tools()).expect_err("reject");
                assert_eq!(err.reason(), "unsupported_platform", "{platform:?} {method}");
            }
        }
    }

    #[test]
    fn system_method_is_windows_only() {
        for os in [OsFamily::Linux, OsFamily::MacOs] {
            let err = validate_method(InstallMethod::System, &PlatformInfo::new(os, 64))
                .expect_err("system rejected");
            assert_eq!(err.reason(), "invalid_method");
        }
    }

    #[test]
    fn virtualenv_method_is_rejected_on_windows() {
        let err = select(InstallMethod::VirtualEnv, &windows(), &conda_only()).expect_err("reject");
        assert_eq!(err.reason(), "invalid_method");
        assert!(err.to_string().contains("virtualenv"));
    }

    #[test]
    fn unix_auto_with_both_viable_picks_virtualenv() {
        let mut tools = full_unix_tools();
        tools.conda = Some(PathBuf::from("/opt/conda/bin/conda"));
        for platform in [linux(), PlatformInfo::new(OsFamily::MacOs, 64)] {
            let strategy = select(InstallMethod::Auto, &platform, &tools).expect("strategy");
            assert_eq!(strategy.label(), "virtualenv", "{platform:?}");
        }
        let strategy = select(InstallMethod::ManagedEnv, &linux(), &tools).expect("strategy");
        assert_eq!(strategy.label(), "conda");
    }

    #[test]
    fn unix_auto_falls_back_to_conda_when_prerequisites_missing() {
        let strategy = select(InstallMethod::Auto, &linux(), &conda_only()).expect("strategy");
        assert_eq!(
            strategy,
            Strategy::ManagedEnv {
                conda: PathBuf::from("/opt/conda/bin/conda")
            }
        );
        let strategy =
            select(InstallMethod::VirtualEnv, &linux(), &conda_only()).expect("strategy");
        assert_eq!(strategy.label(), "conda");
    }

    #[test]
    fn unix_missing_prerequisites_without_conda_lists_commands() {
        let mut tools = full_unix_tools();
        tools.virtualenv = None;
        let err = select(InstallMethod::Auto, &linux(), &tools).expect_err("missing");
        assert_eq!(err.reason(), "missing_tool");
        assert_eq!(err.to_string(), "virtualenv not found");
        let hint = err.hint().expect("hint");
        assert!(hint.contains("apt-get install python3"), "{hint}");

        let err = select(
            InstallMethod::VirtualEnv,
            &PlatformInfo::new(OsFamily::MacOs, 64),
            &ToolAvailability::default(),
        )
        .expect_err("missing");
        assert!(err.to_string().starts_with("python, pip, virtualenv"));
        assert!(err.hint().expect("hint").contains("easy_install"));
    }

    #[test]
    fn python2_hint_uses_python2_packages() {
        let hint = unix_prerequisites_hint(&OsFamily::Linux, Some(PythonVersion::new(2, 7)));
        assert!(hint.contains("python-pip python-virtualenv"), "{hint}");
    }

    #[test]
    fn explicit_conda_requires_conda() {
        let err = select(InstallMethod::ManagedEnv, &linux(), &full_unix_tools())
            .expect_err("conda missing");
        assert_eq!(err.to_string(), "conda not found");
        let err =
            select(InstallMethod::ManagedEnv, &windows(), &ToolAvailability::default())
                .expect_err("conda missing");
        assert_eq!(err.reason(), "missing_tool");
    }

    #[test]
    fn windows_auto_prefers_conda_then_system() {
        let python = Interpreter::new("C:\\Python35\\python.exe", PythonVersion::new(3, 5));
        let both = ToolAvailability {
            python: Some(python.clone()),
            conda: Some(PathBuf::from("C:\\Miniconda3\\Scripts\\conda.exe")),
            ..ToolAvailability::default()
        };
        assert_eq!(
            select(InstallMethod::Auto, &windows(), &both).expect("strategy").label(),
            "conda"
        );

        let python_only = ToolAvailability {
            python: Some(python.clone()),
            ..ToolAvailability::default()
        };
        assert_eq!(
            select(InstallMethod::Auto, &windows(), &python_only).expect("strategy"),
            Strategy::System { python }
        );
    }

    #[test]
    fn windows_without_python_or_conda_points_at_installers() {
        let err = select(InstallMethod::Auto, &windows(), &ToolAvailability::default())
            .expect_err("nothing installed");
        assert_eq!(err.to_string(), "64-bit Python 3.5 not found");
        assert!(err.hint().expect("hint").contains("anaconda.com"));

        let err = select(InstallMethod::System, &windows(), &conda_only())
            .expect_err("system needs python");
        assert_eq!(err.reason(), "missing_tool");
    }

    #[test]
    fn only_system_strategy_forbids_native_builds() {
        let system = Strategy::System { python: python3() };
        assert!(!system.allows_native_builds());
        let conda = Strategy::ManagedEnv {
            conda: PathBuf::from("conda"),
        };
        assert!(conda.allows_native_builds());
    }

    #[test]
    fn pip_variant_tracks_major_version() {
        assert_eq!(pip_variant(PythonVersion::new(2, 7)), "pip");
        assert_eq!(pip_variant(PythonVersion::new(3, 6)), "pip3");
    }
}
