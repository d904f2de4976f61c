use url::Url;

use crate::{Result, StoreAuthError};

/// Explicit configuration for the store authorization flow.
///
/// Passed by value into each component so tests can run with arbitrary
/// configurations side by side; nothing reads ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the application server hosting the discharge endpoint
    pub base_url: Url,
    /// Base URL of the SSO service
    pub sso_url: Url,
    /// Base URL of the store API
    pub store_api_url: Url,
}

impl StoreConfig {
    pub fn new(base_url: &str, sso_url: &str, store_api_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_url(base_url)?,
            sso_url: parse_url(sso_url)?,
            store_api_url: parse_url(store_api_url)?,
        })
    }

    /// Host component of the SSO base URL.
    ///
    /// Third-party caveat locations are matched against this by exact
    /// string equality.
    pub fn sso_host(&self) -> Result<&str> {
        self.sso_url.host_str().ok_or_else(|| {
            StoreAuthError::InvalidConfig(format!("SSO URL {} has no host", self.sso_url))
        })
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| StoreAuthError::InvalidConfig(format!("{value}: {e}")))
}
