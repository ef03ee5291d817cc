//! Fetch error taxonomy.
//!
//! Every fetch attempt resolves to `Result<Vec<Adventure>, FetchError>`; the
//! UI layer decides how to present a failure. All failures are terminal for
//! that attempt — no retry, and the previously loaded list stays untouched.

use thiserror::Error;

/// Why a fetch attempt failed.
///
/// The `Display` output is the user-facing alert message: transport and
/// decode failures share a generic message, server failures show the
/// server-provided text verbatim.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a usable response body.
    #[error("Internal error. Please try again")]
    Transport(#[source] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("Internal error. Please try again")]
    Decode(String),

    /// A local data file could not be read.
    #[error("Internal error. Please try again")]
    Io(#[source] std::io::Error),

    /// The server answered with an application-level `error` field.
    #[error("{0}")]
    Server(String),
}

impl FetchError {
    /// Alert title for the error modal.
    pub fn title(&self) -> &'static str {
        match self {
            FetchError::Server(_) => "Something went wrong",
            _ => "Error occurred",
        }
    }

    /// Technical detail for the dim footer of the alert, when there is any
    /// beyond the user-facing message.
    pub fn detail(&self) -> Option<String> {
        match self {
            FetchError::Transport(e) => Some(e.to_string()),
            FetchError::Decode(detail) => Some(detail.clone()),
            FetchError::Io(e) => Some(e.to_string()),
            FetchError::Server(_) => None,
        }
    }
}
