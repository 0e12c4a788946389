use std::io;
use thiserror::Error;

/// Failures of the byte stream feeding the acquisition loop.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The port could not be opened. Fatal at startup.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Nothing arrived within the read timeout.
    #[error("read timed out")]
    Timeout,

    #[error("read failed: {0}")]
    Read(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("text encode error: {0}")]
    Csv(#[from] csv::Error),
}

/// Ends the acquisition loop. Stream and decode failures never do.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Output(#[from] OutputError),
}
