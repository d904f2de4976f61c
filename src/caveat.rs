use serde::{Deserialize, Serialize};

use crate::{Result, StoreAuthError};

/// Discriminant of a packet within a macaroon's caveat stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketKind {
    /// Caveat identifier; opens a new caveat
    Cid,
    /// Verification-key identifier; third-party caveats only
    Vid,
    /// Caveat location; third-party caveats only
    Cl,
}

/// One typed, ordered chunk of a macaroon's serialized caveat list.
///
/// Caveats are carried as a flat packet stream: a `Cid` packet opens a
/// caveat and any `Vid`/`Cl` packets that follow fill it in. The next
/// `Cid` is the only delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveatPacket {
    pub kind: PacketKind,
    pub value: String,
}

impl CaveatPacket {
    pub fn new(kind: PacketKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A caveat assembled from a macaroon's packet stream.
///
/// Empty `verification_key_id` and `location` mark a first-party caveat
/// (self-verifiable by the issuing service). A non-empty
/// `verification_key_id` marks a third-party caveat that must be
/// discharged by the service at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    pub caveat_id: String,
    pub verification_key_id: String,
    pub location: String,
}

impl Caveat {
    fn open(caveat_id: impl Into<String>) -> Self {
        Self {
            caveat_id: caveat_id.into(),
            verification_key_id: String::new(),
            location: String::new(),
        }
    }

    /// Returns true if this is a first-party caveat
    pub fn is_first_party(&self) -> bool {
        self.verification_key_id.is_empty() && self.location.is_empty()
    }

    /// Returns true if this is a third-party caveat
    pub fn is_third_party(&self) -> bool {
        !self.is_first_party()
    }
}

/// Iterator decoding a caveat packet stream into [`Caveat`] records.
///
/// Yields exactly one caveat per `Cid` packet, in packet order. A caveat
/// is emitted when the next `Cid` opens its successor, with the last open
/// caveat flushed once the stream ends.
///
/// A `Vid` or `Cl` packet arriving before any `Cid` is malformed input;
/// the decoder yields [`StoreAuthError::MalformedMacaroon`] and fuses.
/// Restart the traversal by asking the macaroon for a fresh decoder.
#[derive(Debug, Clone)]
pub struct CaveatDecoder<'a> {
    packets: std::slice::Iter<'a, CaveatPacket>,
    current: Option<Caveat>,
    poisoned: bool,
}

impl<'a> CaveatDecoder<'a> {
    pub fn new(packets: &'a [CaveatPacket]) -> Self {
        Self {
            packets: packets.iter(),
            current: None,
            poisoned: false,
        }
    }
}

impl Iterator for CaveatDecoder<'_> {
    type Item = Result<Caveat>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }

        for packet in self.packets.by_ref() {
            match packet.kind {
                PacketKind::Cid => {
                    let finished = self.current.replace(Caveat::open(packet.value.clone()));
                    if let Some(caveat) = finished {
                        return Some(Ok(caveat));
                    }
                }
                PacketKind::Vid => match self.current.as_mut() {
                    Some(caveat) => caveat.verification_key_id = packet.value.clone(),
                    None => {
                        self.poisoned = true;
                        return Some(Err(StoreAuthError::MalformedMacaroon(
                            "verification-key packet before any caveat identifier".to_string(),
                        )));
                    }
                },
                PacketKind::Cl => match self.current.as_mut() {
                    Some(caveat) => caveat.location = packet.value.clone(),
                    None => {
                        self.poisoned = true;
                        return Some(Err(StoreAuthError::MalformedMacaroon(
                            "location packet before any caveat identifier".to_string(),
                        )));
                    }
                },
            }
        }

        self.current.take().map(Ok)
    }
}
