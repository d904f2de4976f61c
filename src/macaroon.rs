use serde::{Deserialize, Serialize};

use crate::Result;
use crate::caveat::{Caveat, CaveatDecoder, CaveatPacket, PacketKind};
use crate::crypto::{SIGNATURE_SIZE, chain_caveat, hmac_sha3, signatures_equal};

/// A macaroon is a bearer credential with embedded, attenuating caveats.
///
/// Caveats are carried as a flat `Cid`/`Vid`/`Cl` packet stream in the
/// order they were added; the signature is an HMAC-SHA3-256 chain over
/// the identifier and each caveat. Two kinds matter for the upload flow:
/// a root macaroon issued by the store, and a discharge macaroon issued
/// by the SSO service to prove a third-party caveat was satisfied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macaroon {
    /// Optional location hint for the issuing service
    pub location: Option<String>,

    /// Public identifier; for a discharge macaroon this is the caveat id
    /// it discharges
    pub identifier: String,

    /// Ordered caveat packet stream
    pub packets: Vec<CaveatPacket>,

    /// HMAC-SHA3-256 signature (32 bytes)
    pub signature: [u8; SIGNATURE_SIZE],
}

impl PartialEq for Macaroon {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
            && self.identifier == other.identifier
            && self.packets == other.packets
            && signatures_equal(&self.signature, &other.signature)
    }
}

impl Eq for Macaroon {}

impl Macaroon {
    /// Mints a new macaroon.
    ///
    /// # Example
    /// ```
    /// use snapstore_auth::Macaroon;
    ///
    /// let root_key = b"store root key; only the store knows it";
    /// let root = Macaroon::new(root_key, "store-root", Some("https://store.example.com"));
    /// assert_eq!(root.identifier, "store-root");
    /// ```
    pub fn new(
        root_key: &[u8],
        identifier: impl Into<String>,
        location: Option<impl Into<String>>,
    ) -> Self {
        let identifier = identifier.into();
        let signature = hmac_sha3(root_key, identifier.as_bytes());

        Self {
            location: location.map(|l| l.into()),
            identifier,
            packets: Vec::new(),
            signature,
        }
    }

    /// Appends a first-party caveat: a single `Cid` packet.
    pub fn add_first_party_caveat(&mut self, caveat_id: impl Into<String>) {
        let caveat_id = caveat_id.into();

        self.signature = chain_caveat(&self.signature, caveat_id.as_bytes());
        self.packets.push(CaveatPacket::new(PacketKind::Cid, caveat_id));
    }

    /// Appends a third-party caveat: `Cid`, `Vid` and `Cl` packets.
    ///
    /// The signature chain is extended with the verification key id.
    pub fn add_third_party_caveat(
        &mut self,
        caveat_id: impl Into<String>,
        verification_key_id: impl Into<String>,
        location: impl Into<String>,
    ) {
        let caveat_id = caveat_id.into();
        let verification_key_id = verification_key_id.into();

        self.signature = chain_caveat(&self.signature, verification_key_id.as_bytes());
        self.packets.push(CaveatPacket::new(PacketKind::Cid, caveat_id));
        self.packets
            .push(CaveatPacket::new(PacketKind::Vid, verification_key_id));
        self.packets.push(CaveatPacket::new(PacketKind::Cl, location));
    }

    /// Mints a discharge macaroon proving a third-party caveat holds.
    ///
    /// The discharge's identifier is the caveat id it discharges; that is
    /// what the acquisition flow checks against the root's SSO caveat.
    pub fn create_discharge(
        verification_key: &[u8],
        caveat_id: impl Into<String>,
        location: Option<impl Into<String>>,
    ) -> Self {
        Self::new(verification_key, caveat_id, location)
    }

    /// Decodes the caveat packet stream lazily, in packet order.
    ///
    /// The returned decoder is single-pass; call this again to restart.
    pub fn caveats(&self) -> CaveatDecoder<'_> {
        CaveatDecoder::new(&self.packets)
    }

    /// Materialized caveat list, one record per `Cid` packet.
    pub fn decoded_caveats(&self) -> Result<Vec<Caveat>> {
        self.caveats().collect()
    }

    /// Binds a discharge macaroon to this macaroon for one request.
    ///
    /// The bound signature is HMAC(discharge signature, this signature),
    /// which ties the discharge to this specific root and prevents replay
    /// against a different one. This macaroon is not modified; bind the
    /// stored, unbound discharge freshly for every outgoing request.
    pub fn bind_discharge(&self, discharge: &Macaroon) -> Macaroon {
        let mut bound = discharge.clone();
        bound.signature = hmac_sha3(&discharge.signature, &self.signature);
        bound
    }
}
