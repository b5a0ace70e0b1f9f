use anyhow::Result;
use tfi_domain::{InstallSettings, PlatformInfo};

use crate::config::{Config, GlobalOptions};
use crate::effects::{self, Effects, SharedEffects};
use crate::probe::detect_platform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    platform: PlatformInfo,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    /// Creates a new command context with the provided global options.
    ///
    /// # Errors
    /// Returns an error if the environment snapshot or configuration cannot be prepared.
    pub fn new(global: &'a GlobalOptions, effects: SharedEffects) -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self {
            global,
            config,
            platform: detect_platform(),
            effects,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        global: &'a GlobalOptions,
        config: Config,
        platform: PlatformInfo,
        effects: SharedEffects,
    ) -> Self {
        Self {
            global,
            config,
            platform,
            effects,
        }
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    pub fn runner(&self) -> &dyn effects::CommandRunner {
        self.effects.runner()
    }

    pub fn fs(&self) -> &dyn effects::FileSystem {
        self.effects.fs()
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &InstallSettings {
        self.config.install()
    }

    pub fn is_online(&self) -> bool {
        self.config.network().online
    }
}
