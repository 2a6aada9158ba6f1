use reqwest::StatusCode;
use thiserror::Error;

/// Enumeration of errors that prevent a `LogShipper` from being constructed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error parsing push url")]
    ParseUrlError(#[from] url::ParseError),
    #[error("{0} is not a valid tenant header value")]
    InvalidTenantError(String),
    #[error("failed to construct http client for log shipper")]
    ClientError(#[from] reqwest::Error),
}

/// A log entry could not be delivered to the push endpoint.
/// No distinction is made between transient and permanent failures: nothing is retried.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("a log entry could not be sent to the push endpoint: {0}")]
    RequestError(reqwest::Error),
    #[error("the push endpoint rejected a log entry: {0}")]
    RejectedError(reqwest::Error),
}

impl DeliveryError {
    /// The response status, when the endpoint answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DeliveryError::RequestError(error) | DeliveryError::RejectedError(error) => {
                error.status()
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("a log shipper has already been installed")]
pub struct AlreadyInstalled;
