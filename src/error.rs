//! Crate error type.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A parameter was looked up by a key which is not in the layout.
    #[error("unknown parameter key \"{0}\"")]
    UnknownParameter(String),

    /// The persisted parameter state could not be read or written.
    #[error("failed to (de)serialise parameter state: {0}")]
    State(#[from] serde_json::Error),

    /// The forward transform rejected its buffers.
    #[error("FFT failed: {0}")]
    Fft(#[from] realfft::FftError),

    /// A command-line argument was missing or malformed.
    #[error("invalid argument: {0}")]
    Argument(String),
}
