use crate::macaroon::Macaroon;
use crate::{Result, StoreAuthError};

/// Finds the identifier of the single third-party caveat the SSO service
/// at `sso_host` must discharge.
///
/// A root macaroon is expected to request exactly one SSO discharge, so
/// zero and multiple matches are both hard errors; ambiguity is never
/// resolved by picking the first or last match. The host is compared to
/// the caveat location by exact string equality.
pub fn extract_sso_caveat(macaroon: &Macaroon, sso_host: &str) -> Result<String> {
    let mut matched: Option<String> = None;

    for caveat in macaroon.caveats() {
        let caveat = caveat?;
        if !caveat.verification_key_id.is_empty() && caveat.location == sso_host {
            if matched.is_some() {
                return Err(StoreAuthError::MultipleSsoCaveats);
            }
            matched = Some(caveat.caveat_id);
        }
    }

    matched.ok_or(StoreAuthError::NoSsoCaveat)
}
