use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("tab index {index} out of range (open tabs: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("too many redirects while resolving '{0}'")]
    RedirectLoop(String),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

pub type TabResult<T> = std::result::Result<T, TabError>;
