//! CLI-facing diagnostics and outcome shaping.

pub(crate) mod outcome;

pub mod diagnostics {
    pub mod commands {
        pub const INSTALL: &str = "TFI100";
        pub const INFO: &str = "TFI200";
        pub const GENERIC: &str = "TFI000";
    }
}
