use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {text:?}: {reason}")]
    Invalid { text: String, reason: String },

    #[error("duration {text:?} must not be negative")]
    Negative { text: String },
}

/// Parses a Go-style duration string such as `90s`, `5m` or `1h30m`.
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    let nanos =
        go_parse_duration::parse_duration(text).map_err(|err| DurationError::Invalid {
            text: text.to_string(),
            reason: format!("{err:?}"),
        })?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| DurationError::Negative {
            text: text.to_string(),
        })
}
