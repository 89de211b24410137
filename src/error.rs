use crate::model::SourceTag;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// One catalog could not produce a snapshot. Fatal for the whole run;
    /// no partial reconciliation is produced.
    InventoryUnavailable { source: SourceTag, reason: String },

    Io(std::io::Error),

    Config(config::ConfigError),

    Csv(csv::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InventoryUnavailable { source, reason } => {
                write!(f, "inventory unavailable for {source}: {reason}")
            }
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Config(e) => write!(f, "Configuration error: {e}"),
            Error::Csv(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InventoryUnavailable { .. } => None,
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}

impl Error {
    pub fn unavailable(source: SourceTag, reason: impl Into<String>) -> Self {
        Error::InventoryUnavailable {
            source,
            reason: reason.into(),
        }
    }
}
