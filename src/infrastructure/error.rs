//! Infrastructure-level errors (wraps application errors)

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use crate::application::ApplicationError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Failure talking to the remote document server.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not UTF-8")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("document server unavailable: {0}")]
    Http(#[from] HttpError),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[source] io::Error),
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// HTTP failures reach the application layer wrapped in `io::Error` by the
/// document source; they are lifted back out here.
impl From<ApplicationError> for InfraError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::OperationFailed { context, source } => match take_http_error(source) {
                Ok(http) => InfraError::Http(http),
                Err(source) => {
                    InfraError::Application(ApplicationError::OperationFailed { context, source })
                }
            },
            other => InfraError::Application(other),
        }
    }
}

fn take_http_error(source: BoxError) -> Result<HttpError, BoxError> {
    let io = source.downcast::<io::Error>()?;
    if !io.get_ref().is_some_and(|inner| inner.is::<HttpError>()) {
        return Err(io);
    }
    let inner = (*io)
        .into_inner()
        .ok_or_else(|| BoxError::from("empty I/O error"))?;
    inner.downcast::<HttpError>().map(|http| *http)
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
