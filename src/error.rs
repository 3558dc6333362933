use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error(transparent)]
    Animation(#[from] AnimationError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification queue is full")]
    QueueFull,
    #[error("notification center has shut down")]
    Closed,
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to access preferences file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid preferences payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("animation task is no longer running")]
    Stopped,
}

impl Error {
    /// Erreurs dont l'effet se limite à une seule fonctionnalité de la page.
    pub const fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::Notify(_) | Self::Prefs(_) | Self::Animation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Error, NotifyError};

    #[test]
    fn notify_failures_only_degrade_a_feature() {
        assert!(Error::from(NotifyError::QueueFull).is_degradable());
        let fatal = Error::from(ConfigError::MissingField {
            field: "contact.whatsapp_number",
        });
        assert!(!fatal.is_degradable());
    }
}
