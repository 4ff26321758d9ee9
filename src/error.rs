use thiserror::Error;

/// Errors raised by the probe pipeline. Every variant is fatal for the run:
/// the first failure aborts the pipeline and no report is printed.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("DNS resolution failed: {0}")]
    Resolution(String),

    #[error("TCP connection failed: {0}")]
    Connection(String),

    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    #[error("HTTP transfer failed: {0}")]
    Transfer(String),
}

impl ProbeError {
    pub fn resolution(msg: impl Into<String>) -> Self {
        ProbeError::Resolution(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        ProbeError::Connection(msg.into())
    }

    pub fn handshake(msg: impl Into<String>) -> Self {
        ProbeError::Handshake(msg.into())
    }

    pub fn transfer(msg: impl Into<String>) -> Self {
        ProbeError::Transfer(msg.into())
    }
}
