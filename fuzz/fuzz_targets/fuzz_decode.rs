#![no_main]

use libfuzzer_sys::fuzz_target;
use snapstore_auth::Macaroon;
use snapstore_auth::caveat::{CaveatPacket, PacketKind};
use snapstore_auth::crypto::SIGNATURE_SIZE;
use snapstore_auth::sso::extract_sso_caveat;

fuzz_target!(|data: &[u8]| {
    let mut packets = Vec::new();
    for chunk in data.chunks(8) {
        let kind = match chunk[0] % 3 {
            0 => PacketKind::Cid,
            1 => PacketKind::Vid,
            _ => PacketKind::Cl,
        };
        let value = String::from_utf8_lossy(&chunk[1..]).into_owned();
        packets.push(CaveatPacket::new(kind, value));
    }

    let macaroon = Macaroon {
        location: None,
        identifier: "fuzz".to_string(),
        packets,
        signature: [0u8; SIGNATURE_SIZE],
    };

    // Decoding must never panic, and two traversals must agree
    let first: Vec<_> = macaroon.caveats().collect();
    let second: Vec<_> = macaroon.caveats().collect();
    assert_eq!(first.len(), second.len());

    // Every Ok caveat corresponds to a Cid packet
    let cids = macaroon
        .packets
        .iter()
        .filter(|p| p.kind == PacketKind::Cid)
        .count();
    assert!(first.iter().filter(|c| c.is_ok()).count() <= cids);

    let _ = extract_sso_caveat(&macaroon, "login.example.com");
});
