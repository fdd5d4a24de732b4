//! Error types for host access and handler installation.
//!
//! Nothing here reaches the visitor. Installation failures disable a single
//! behaviour and are logged by [`crate::app::boot`]; runtime failures inside
//! handlers are logged where they happen.

/// A capability call on the [`crate::host::Host`] failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Persistent storage is missing or refused access (private mode, quota, policy).
    #[error("storage unavailable: {0}")]
    Storage(String),
    /// A DOM call threw.
    #[error("dom operation failed: {0}")]
    Dom(String),
    /// A browser global (`window`, `document`, `body`) does not exist.
    #[error("browser global missing: {0}")]
    Missing(&'static str),
}

/// A behaviour could not be installed on the current page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// The markup lacks an element the behaviour is wired to.
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },
    #[error(transparent)]
    Host(#[from] HostError),
}

impl SetupError {
    pub(crate) fn missing(selector: &str) -> Self {
        Self::MissingElement { selector: selector.to_owned() }
    }
}
