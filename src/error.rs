use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutageError {
    /// The monitoring API answered with a server error.  Fatal for the run.
    #[error("Oops! Request to {url} returned a {status}")]
    RemoteServer { url: String, status: u16 },

    #[error("Failed to parse the response from {url} (status {status}): {source}")]
    MalformedResponse {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Outage of device {id} has an invalid begin timestamp {value:?}: {source}")]
    InvalidTimestamp {
        id: String,
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error("Missing configuration value {0}")]
    ConfigurationMissing(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
