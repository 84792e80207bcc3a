use thiserror::Error;

/// Errors raised while configuring or running the concert playlist pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code @ (401 | 403), response) => Error::Auth(format!(
                "{} returned status {}",
                response.get_url(),
                code
            )),
            ureq::Error::Status(code, response) => Error::Transport(format!(
                "{} returned status {}",
                response.get_url(),
                code
            )),
            ureq::Error::Transport(transport) => Error::Transport(transport.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = Error::MissingCredential("SEATGEEK_CLIENT_ID".to_string());
        assert_eq!(
            err.to_string(),
            "Missing credential: environment variable SEATGEEK_CLIENT_ID is not set"
        );

        let err = Error::Config("end_date is before start_date".to_string());
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_json_errors_convert() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
