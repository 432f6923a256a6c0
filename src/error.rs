use thiserror::Error;

/// Failures of the ambient layer: configuration, terminal and log setup.
///
/// Hypervisor and host command failures never show up here; the gateway and
/// resolver fold those into sentinel values or a [`crate::gateway::Diagnostic`].
#[derive(Debug, Error)]
pub enum VirtdeckError {
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Configuration parse error: {0}")]
    SerdeError(String),
    #[error("Terminal error: {0}")]
    TerminalError(String),
    #[error("Logging setup failed: {0}")]
    LoggingError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for VirtdeckError {
    fn from(err: toml::de::Error) -> Self {
        VirtdeckError::SerdeError(err.to_string())
    }
}
