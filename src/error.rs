use thiserror::Error;

/// Errors that can occur while acquiring or exercising store authorization
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreAuthError {
    /// The root macaroon carries no third-party caveat for the SSO service
    #[error("Macaroon has no SSO caveats")]
    NoSsoCaveat,

    /// The root macaroon carries more than one caveat for the SSO service
    #[error("Macaroon has multiple SSO caveats")]
    MultipleSsoCaveats,

    /// No root macaroon is saved in the credential store
    #[error("No store root macaroon saved in the credential store")]
    NoRootMacaroon,

    /// The discharge identifier does not name the root's SSO caveat
    #[error("SSO discharge macaroon does not match store root macaroon")]
    DischargeMismatch,

    /// The stored bundle has a root but no discharge yet
    #[error("Upload request bundle has no discharge macaroon")]
    MissingDischarge,

    /// The caveat packet stream is not well formed
    #[error("Malformed macaroon: {0}")]
    MalformedMacaroon(String),

    /// Failed to deserialize a macaroon
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The credential store failed to read or write
    #[error("Credential store error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The discharge endpoint reported a failure
    #[error("SSO discharge request failed: {message}")]
    Discharge { code: Option<String>, message: String },

    /// A network request could not be completed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for StoreAuthError {
    fn from(err: reqwest::Error) -> Self {
        StoreAuthError::Transport(err.to_string())
    }
}
