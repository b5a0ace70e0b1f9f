use crate::{is_latest, InstallSettings};

/// Where the primary package comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimarySource<'a> {
    /// User-supplied URL or requirement, used verbatim.
    Override(&'a str),
    /// Version token; `"latest"` leaves the pin to pip.
    Version(&'a str),
}

/// Primary requirement handed to pip.
#[must_use]
pub fn primary_spec(source: PrimarySource<'_>, gpu: bool, settings: &InstallSettings) -> String {
    match source {
        PrimarySource::Override(locator) => locator.to_string(),
        PrimarySource::Version(token) if is_latest(token) => settings.package_name(gpu).to_string(),
        PrimarySource::Version(token) => {
            format!("{}=={}", settings.package_name(gpu), token.trim())
        }
    }
}

/// Companion packages in install order, with the native companion appended on request.
#[must_use]
pub fn companion_packages(settings: &InstallSettings, include_native: bool) -> Vec<String> {
    let mut packages = settings.companions.clone();
    if include_native {
        packages.push(settings.native_companion.clone());
    }
    packages
}

/// Primary first, then companions.
#[must_use]
pub fn package_list(
    source: PrimarySource<'_>,
    gpu: bool,
    include_native: bool,
    settings: &InstallSettings,
) -> Vec<String> {
    let mut packages = vec![primary_spec(source, gpu, settings)];
    packages.extend(companion_packages(settings, include_native));
    packages
}
