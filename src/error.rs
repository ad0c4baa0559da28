use std::path::PathBuf;

/// Broad failure classes a caller can branch on without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Endpoint configuration is missing or unusable.
    Config,
    /// The request never completed, or the endpoint answered with a non-success status.
    Network,
    /// The endpoint answered, but the body could not be understood.
    MalformedResponse,
    /// The report could not be written to its destination.
    Output,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} is not set")]
    MissingConfig(&'static str),

    #[error("{name} is not a valid URL: {source}")]
    InvalidConfig {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("could not write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingConfig(_) | Error::InvalidConfig { .. } => ErrorKind::Config,
            Error::Transport { .. } | Error::Status { .. } => ErrorKind::Network,
            Error::Malformed(_) => ErrorKind::MalformedResponse,
            Error::Output { .. } => ErrorKind::Output,
        }
    }

    pub(crate) fn transport(endpoint: &url::Url, source: ureq::Error) -> Self {
        Error::Transport {
            endpoint: endpoint.to_string(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
