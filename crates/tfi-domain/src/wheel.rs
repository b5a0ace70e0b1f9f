use crate::{OsFamily, PythonVersion, ResolvedVersion};

/// Segments substituted into the wheel URL template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WheelSegments {
    pub platform: &'static str,
    pub accelerator: &'static str,
    pub package: &'static str,
    pub abi: String,
    pub arch: &'static str,
}

impl WheelSegments {
    /// Returns `None` for platforms without published wheels.
    #[must_use]
    pub fn for_target(os: &OsFamily, gpu: bool, python: PythonVersion) -> Option<Self> {
        let (platform, arch) = match os {
            OsFamily::Windows => ("windows", "win_amd64"),
            OsFamily::MacOs => ("mac", "any"),
            OsFamily::Linux => ("linux", "linux_x86_64"),
            OsFamily::Other(_) => return None,
        };
        Some(Self {
            platform,
            accelerator: if gpu { "gpu" } else { "cpu" },
            package: if gpu { "tensorflow_gpu" } else { "tensorflow" },
            abi: abi_tag(os, python),
            arch,
        })
    }
}

/// Python/ABI pair of the wheel filename.
///
/// macOS wheels are pure `py3-none`/`py2-none`; elsewhere CPython tags are used.
#[must_use]
pub fn abi_tag(os: &OsFamily, python: PythonVersion) -> String {
    if matches!(os, OsFamily::MacOs) {
        return format!("py{}-none", python.major);
    }
    let digits = python.tag_digits();
    if python.major >= 3 {
        format!("cp{digits}-cp{digits}m")
    } else {
        format!("cp{digits}-none")
    }
}

#[must_use]
pub fn wheel_url(
    template: &str,
    version: &ResolvedVersion,
    gpu: bool,
    os: &OsFamily,
    python: PythonVersion,
) -> Option<String> {
    let segments = WheelSegments::for_target(os, gpu, python)?;
    Some(
        template
            .replace("{platform}", segments.platform)
            .replace("{accelerator}", segments.accelerator)
            .replace("{package}", segments.package)
            .replace("{version}", version.as_str())
            .replace("{abi}", &segments.abi)
            .replace("{arch}", segments.arch),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_WHEEL_URL_TEMPLATE;

    fn url(gpu: bool, os: &OsFamily, python: PythonVersion) -> String {
        wheel_url(
            DEFAULT_WHEEL_URL_TEMPLATE,
            &ResolvedVersion::passthrough("1.1.0"),
            gpu,
            os,
            python,
        )
        .expect("supported platform")
    }

    #[test]
    fn linux_cpu_python35_wheel() {
        let url = url(false, &OsFamily::Linux, PythonVersion::new(3, 5));
        assert_eq!(
            url,
            "https://storage.googleapis.com/tensorflow/linux/cpu/tensorflow-1.1.0-cp35-cp35m-linux_x86_64.whl"
        );
    }

    #[test]
    fn linux_python2_uses_none_abi() {
        let url = url(false, &OsFamily::Linux, PythonVersion::new(2, 7));
        assert!(url.ends_with("tensorflow-1.1.0-cp27-none-linux_x86_64.whl"), "{url}");
    }

    #[test]
    fn windows_gpu_wheel_uses_gpu_package_and_amd64() {
        let url = url(true, &OsFamily::Windows, PythonVersion::new(3, 5));
        assert_eq!(
            url,
            "https://storage.googleapis.com/tensorflow/windows/gpu/tensorflow_gpu-1.1.0-cp35-cp35m-win_amd64.whl"
        );
    }

    #[test]
    fn mac_wheels_are_generic() {
        let url = url(false, &OsFamily::MacOs, PythonVersion::new(3, 6));
        assert!(url.contains("/mac/cpu/"), "{url}");
        assert!(url.ends_with("tensorflow-1.1.0-py3-none-any.whl"), "{url}");
        assert_eq!(abi_tag(&OsFamily::MacOs, PythonVersion::new(2, 7)), "py2-none");
    }

    #[test]
    fn unsupported_platforms_have_no_wheel() {
        assert!(wheel_url(
            DEFAULT_WHEEL_URL_TEMPLATE,
            &ResolvedVersion::passthrough("1.1.0"),
            false,
            &OsFamily::Other("haiku".into()),
            PythonVersion::new(3, 5),
        )
        .is_none());
    }
}
