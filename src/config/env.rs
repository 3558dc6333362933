use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

pub(super) fn env_string(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(err.to_string())),
    }
}

/// Blank values count as unset.
fn env_trimmed(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    Ok(env_string(key)?
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

pub(super) fn env_parse<T>(key: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_trimmed(key)?
        .map(|value| value.parse::<T>())
        .transpose()
        .map_err(|err| invalid(key, err))
}

pub(super) fn env_duration(
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    env_trimmed(key)?
        .map(|value| parse_duration(&value))
        .transpose()
        .map_err(|err| invalid(key, err))
}

fn invalid(field: &'static str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidField {
        field,
        message: err.to_string(),
    }
}
