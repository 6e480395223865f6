/// Result alias that carries the custom [`GreetingError`] type.
pub type Result<T> = std::result::Result<T, GreetingError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum GreetingError {
    /// Free-form failure with a readable message.
    #[error("{0}")]
    Message(String),
    /// A component was constructed or driven with arguments it cannot use.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The hosting environment refused to start playback, usually because no
    /// user gesture has happened yet. The playback coordinator always
    /// recovers from this locally.
    #[error("media start rejected: {reason}")]
    MediaStartRejected { reason: String },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or script files that failed to parse.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl GreetingError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn rejected<T: Into<String>>(reason: T) -> Self {
        Self::MediaStartRejected {
            reason: reason.into(),
        }
    }
}

impl From<&str> for GreetingError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for GreetingError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_mentions_reason() {
        let err = GreetingError::rejected("no user gesture");
        assert!(format!("{err}").contains("no user gesture"));
    }

    #[test]
    fn strings_convert_into_messages() {
        let err: GreetingError = "broken".into();
        assert!(matches!(err, GreetingError::Message(ref m) if m == "broken"));
    }
}
