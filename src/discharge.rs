use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::StoreConfig;
use crate::macaroon::Macaroon;
use crate::sso::extract_sso_caveat;
use crate::storage::{CredentialStore, read_bundle, write_bundle};
use crate::{Result, StoreAuthError};

/// Path of the session-bound discharge endpoint on the application server
const DISCHARGE_PATH: &str = "/login/sso-discharge";

/// The server endpoint holding the SSO session's discharge macaroon.
///
/// The server performed the SSO login and holds the session; the client
/// only ever sees the resulting discharge. This trait is the seam tests
/// use to stand in for the network.
#[allow(async_fn_in_trait)]
pub trait DischargeEndpoint {
    /// Fetches the serialized discharge macaroon for the current session
    async fn fetch(&self) -> Result<String>;

    /// Deletes the server-held copy of the discharge
    async fn delete(&self) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct DischargeEnvelope {
    status: String,
    #[serde(default)]
    payload: Option<DischargePayload>,
}

#[derive(Debug, Default, Deserialize)]
struct DischargePayload {
    #[serde(default)]
    discharge: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn discharge_from_envelope(envelope: DischargeEnvelope) -> Result<String> {
    let payload = envelope.payload.unwrap_or_default();
    if envelope.status == "success" {
        payload.discharge.ok_or_else(|| StoreAuthError::Discharge {
            code: None,
            message: "discharge endpoint returned no macaroon".to_string(),
        })
    } else {
        Err(StoreAuthError::Discharge {
            code: payload.code,
            message: payload
                .message
                .unwrap_or_else(|| "discharge request failed".to_string()),
        })
    }
}

/// Discharge endpoint reached over HTTP
pub struct HttpDischargeEndpoint {
    client: Client,
    base_url: Url,
}

impl HttpDischargeEndpoint {
    pub fn new(config: &StoreConfig) -> Self {
        let client = Client::builder()
            .user_agent("snapstore-auth")
            .build()
            .expect("failed to construct HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self) -> Result<Url> {
        self.base_url.join(DISCHARGE_PATH).map_err(|e| {
            StoreAuthError::InvalidConfig(format!("cannot form discharge URL: {e}"))
        })
    }
}

impl DischargeEndpoint for HttpDischargeEndpoint {
    async fn fetch(&self) -> Result<String> {
        let url = self.url()?;
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            let code = res.status();
            let message = res.text().await.unwrap_or_default();
            return Err(StoreAuthError::Discharge {
                code: Some(code.to_string()),
                message,
            });
        }
        let envelope: DischargeEnvelope = res.json().await?;
        discharge_from_envelope(envelope)
    }

    async fn delete(&self) -> Result<()> {
        let url = self.url()?;
        let res = self.client.delete(url).send().await?;
        if !res.status().is_success() {
            return Err(StoreAuthError::Discharge {
                code: Some(res.status().to_string()),
                message: "failed to delete server-held discharge".to_string(),
            });
        }
        Ok(())
    }
}

/// Acquires the SSO discharge for the stored root macaroon and persists
/// the completed bundle.
///
/// The steps run strictly in sequence, each one feeding the next: fetch
/// the discharge, read the stored bundle (absent →
/// [`StoreAuthError::NoRootMacaroon`]), extract the root's SSO caveat id,
/// and check it against the discharge's identifier (mismatch →
/// [`StoreAuthError::DischargeMismatch`], nothing persisted). On a match
/// the bundle is re-written with the discharge attached, merging over the
/// freshly-read bundle so a root written by another in-flight flow is
/// preserved.
///
/// The final server-side delete is best-effort: the bundle is already
/// durable, so a failure there is logged and swallowed.
pub async fn acquire_discharge<E, S>(endpoint: &E, store: &S, sso_host: &str) -> Result<()>
where
    E: DischargeEndpoint,
    S: CredentialStore,
{
    let serialized_discharge = endpoint.fetch().await?;
    debug!("fetched discharge macaroon from server session");

    let bundle = read_bundle(store)?.ok_or(StoreAuthError::NoRootMacaroon)?;

    let root = Macaroon::from_base64(&bundle.root)?;
    let expected_caveat_id = extract_sso_caveat(&root, sso_host)?;

    let discharge = Macaroon::from_base64(&serialized_discharge)?;
    if discharge.identifier != expected_caveat_id {
        return Err(StoreAuthError::DischargeMismatch);
    }
    debug!(caveat_id = %expected_caveat_id, "discharge matches root SSO caveat");

    write_bundle(store, &bundle.with_discharge(serialized_discharge))?;

    if let Err(e) = endpoint.delete().await {
        warn!(error = %e, "failed to delete server-held discharge; continuing");
    }

    Ok(())
}
