use ::time::format_description::well_known::Rfc3339;

use super::*;

const SECONDS_PER_HOUR: i64 = 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error(transparent)]
    Field(#[from] subscriptionv1::FieldError),

    #[error("invalid RFC3339 timestamp {text:?}")]
    Parse {
        text: String,
        #[source]
        source: ::time::error::Parse,
    },
}

pub trait TimeExt: Sized {
    fn parse_rfc3339(text: &str) -> Result<Self, TimestampError>;
    fn to_rfc3339(&self) -> String;
    fn whole_hours_since(&self, earlier: &Self) -> i64;
}

impl TimeExt for OffsetDateTime {
    fn parse_rfc3339(text: &str) -> Result<Self, TimestampError> {
        Self::parse(text, &Rfc3339).map_err(|source| TimestampError::Parse {
            text: text.to_string(),
            source,
        })
    }

    fn to_rfc3339(&self) -> String {
        self.format(&Rfc3339)
            .unwrap_or_else(|_| self.unix_timestamp().to_string())
    }

    /// Elapsed whole hours between `earlier` and `self`, truncated toward zero.
    ///
    /// Both instants are reduced to Unix seconds first, so sub-second parts
    /// never contribute. A negative span (clock skew) truncates toward zero as
    /// well, so anything less than an hour in the future reads as `0`.
    fn whole_hours_since(&self, earlier: &Self) -> i64 {
        (self.unix_timestamp() - earlier.unix_timestamp()) / SECONDS_PER_HOUR
    }
}
