//! Error types for the sources crate.

use thiserror::Error;

/// Errors raised by a rate source.
///
/// Every variant is source-local and recoverable from the caller's point of
/// view: the orchestrator logs it and moves on to the next pair or source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source endpoint could not be fetched: transport failure or a
    /// non-success HTTP status.
    #[error("Source unavailable: {source} - {message}")]
    Unavailable {
        /// The source that failed
        source: String,
        /// Transport or status detail
        message: String,
    },

    /// The request to the source exceeded the fixed deadline.
    #[error("Timeout: {source}")]
    Timeout {
        /// The source that timed out
        source: String,
    },

    /// The source document was fetched but a field was malformed or missing.
    /// A pair that genuinely is not published is `Ok(None)`, never this.
    #[error("Parse error: {source} - {message}")]
    Parse {
        /// The source whose document failed to parse
        source: String,
        /// What was malformed
        message: String,
    },
}

impl SourceError {
    /// Map a reqwest failure into the source taxonomy.
    ///
    /// Timeouts get their own variant so callers can see the deadline was the
    /// problem rather than the endpoint.
    pub fn from_request(source: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                source: source.to_string(),
            }
        } else {
            Self::Unavailable {
                source: source.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Shorthand for a malformed-field failure.
    pub fn parse(source: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            source: source.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = SourceError::parse("NBU", "missing rate cell");
        assert_eq!(format!("{}", error), "Parse error: NBU - missing rate cell");
    }

    #[test]
    fn test_timeout_display() {
        let error = SourceError::Timeout {
            source: "PRIVATBANK".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout: PRIVATBANK");
    }
}
