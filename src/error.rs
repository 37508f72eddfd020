use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidDate,
    UnknownToken,
    MalformedToken,
    InvalidPrefix,
    HolidayLoad,
    Config,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    /// Token errors mean "not for us" or "stale"; callers drop the tap.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnknownToken | ErrorKind::MalformedToken
        )
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(
            ErrorKind::Config,
            format!("Could not parse config: {}", toml_error).as_str(),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::HolidayLoad,
            format!("Could not parse holidays: {}", json_error).as_str(),
        )
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(error: nom::Err<E>) -> Self {
        Error::new(
            ErrorKind::MalformedToken,
            &format!("Error while parsing: {}", error),
        )
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err.kind {
            ErrorKind::IOError(err) => err,
            kind => io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| kind.as_str()),
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidDate => "invalid date".to_owned(),
            ErrorKind::UnknownToken => "unknown token".to_owned(),
            ErrorKind::MalformedToken => "malformed token".to_owned(),
            ErrorKind::InvalidPrefix => "invalid token prefix".to_owned(),
            ErrorKind::HolidayLoad => "could not load holiday".to_owned(),
            ErrorKind::Config => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let bare = Error::from(ErrorKind::UnknownToken);
        assert_eq!(bare.to_string(), "unknown token");

        let with_msg = Error::new(ErrorKind::InvalidDate, "month 13 out of range");
        assert_eq!(with_msg.to_string(), "invalid date: month 13 out of range");
    }

    #[test]
    fn only_token_errors_are_recoverable() {
        assert!(Error::from(ErrorKind::UnknownToken).is_recoverable());
        assert!(Error::from(ErrorKind::MalformedToken).is_recoverable());
        assert!(!Error::from(ErrorKind::InvalidDate).is_recoverable());
        assert!(!Error::from(ErrorKind::HolidayLoad).is_recoverable());
    }

    #[test]
    fn io_errors_round_trip() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::NotFound);
    }
}
