#![forbid(unsafe_code)]

use tinks_core::ConfigError;

/// Errors that prevent the page from being wired at all.
///
/// Missing optional elements (controls, arrows, splash) never produce an
/// error; they are logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// Not running inside a browser window.
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// A required element could not be found.
    MissingElement(String),
    /// The host-provided configuration was rejected.
    Config(ConfigError),
}

impl core::fmt::Display for MountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::MissingElement(what) => write!(f, "required element not found: {what}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for MountError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
