use crate::macaroon::Macaroon;
use crate::storage::UploadRequestBundle;
use crate::{Result, StoreAuthError};

/// Builds the `Authorization` header value for one store request.
///
/// Both inputs are base64-serialized macaroons. The root is passed
/// through unmodified; the discharge is bound to the root's signature
/// freshly on every call. Never cache a bound discharge across requests;
/// always bind from the stored, unbound one.
pub fn authorization_header(root: &str, discharge: &str) -> Result<String> {
    let root_macaroon = Macaroon::from_base64(root)?;
    let discharge_macaroon = Macaroon::from_base64(discharge)?;

    let bound = root_macaroon.bind_discharge(&discharge_macaroon);

    Ok(format!(
        r#"Macaroon root="{root}", discharge="{}""#,
        bound.to_base64()?
    ))
}

/// Header for a completed upload request bundle
pub fn header_for_bundle(bundle: &UploadRequestBundle) -> Result<String> {
    let discharge = bundle
        .discharge
        .as_deref()
        .ok_or(StoreAuthError::MissingDischarge)?;
    authorization_header(&bundle.root, discharge)
}
