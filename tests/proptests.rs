use proptest::prelude::*;
use snapstore_auth::caveat::{CaveatPacket, PacketKind};
use snapstore_auth::crypto::SIGNATURE_SIZE;
use snapstore_auth::sso::extract_sso_caveat;
use snapstore_auth::{Macaroon, StoreAuthError};

// Configuration for credential-handling code: run many more cases than
// the default (100); this is the trust boundary for attacker-supplied
// byte strings
fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 10000,
        ..ProptestConfig::default()
    }
}

const SSO_HOST: &str = "login.example.com";

#[derive(Debug, Clone)]
enum CaveatSpec {
    First(String),
    Third {
        caveat_id: String,
        key: String,
        location: String,
    },
}

impl CaveatSpec {
    fn caveat_id(&self) -> &str {
        match self {
            CaveatSpec::First(id) => id,
            CaveatSpec::Third { caveat_id, .. } => caveat_id,
        }
    }

    fn add_to(&self, macaroon: &mut Macaroon) {
        match self {
            CaveatSpec::First(id) => macaroon.add_first_party_caveat(id.clone()),
            CaveatSpec::Third {
                caveat_id,
                key,
                location,
            } => macaroon.add_third_party_caveat(caveat_id.clone(), key.clone(), location.clone()),
        }
    }
}

fn caveat_spec() -> impl Strategy<Value = CaveatSpec> {
    prop_oneof![
        "[a-z0-9 =]{1,16}".prop_map(CaveatSpec::First),
        // Locations drawn from .example.net can never collide with the
        // SSO host used in these properties
        ("[a-z0-9 ]{1,16}", "[a-z0-9]{1,12}", "[a-z]{1,10}\\.example\\.net").prop_map(
            |(caveat_id, key, location)| CaveatSpec::Third {
                caveat_id,
                key,
                location,
            }
        ),
    ]
}

fn macaroon_from(specs: &[CaveatSpec]) -> Macaroon {
    let mut macaroon = Macaroon::new(b"prop root key", "store-root", None::<String>);
    for spec in specs {
        spec.add_to(&mut macaroon);
    }
    macaroon
}

/// Property: the decoder yields exactly one caveat per Cid packet, in
/// the order the caveats were added
#[test]
fn prop_one_caveat_per_cid_in_order() {
    let config = proptest_config();
    proptest!(config, |(specs in prop::collection::vec(caveat_spec(), 0..10))| {
        let macaroon = macaroon_from(&specs);

        let caveats = macaroon.decoded_caveats().unwrap();

        prop_assert_eq!(caveats.len(), specs.len());
        for (caveat, spec) in caveats.iter().zip(&specs) {
            prop_assert_eq!(&caveat.caveat_id, spec.caveat_id());
        }
    });
}

/// Property: decoding is restartable; two traversals agree
#[test]
fn prop_decoder_restartable() {
    let config = proptest_config();
    proptest!(config, |(specs in prop::collection::vec(caveat_spec(), 0..10))| {
        let macaroon = macaroon_from(&specs);

        let first: Vec<_> = macaroon.caveats().map(|c| c.unwrap()).collect();
        let second: Vec<_> = macaroon.caveats().map(|c| c.unwrap()).collect();

        prop_assert_eq!(first, second);
    });
}

/// Property: with exactly one SSO caveat present, extraction returns its
/// id wherever it sits among other caveats
#[test]
fn prop_extract_single_sso_caveat() {
    let config = proptest_config();
    proptest!(config, |(
        before in prop::collection::vec(caveat_spec(), 0..5),
        after in prop::collection::vec(caveat_spec(), 0..5),
        caveat_id in "[a-z0-9 ]{1,16}",
        key in "[a-z0-9]{1,12}"
    )| {
        let mut macaroon = macaroon_from(&before);
        macaroon.add_third_party_caveat(caveat_id.clone(), key, SSO_HOST);
        for spec in &after {
            spec.add_to(&mut macaroon);
        }

        prop_assert_eq!(extract_sso_caveat(&macaroon, SSO_HOST).unwrap(), caveat_id);
    });
}

/// Property: with no caveat matching the SSO host, extraction fails with
/// NoSsoCaveat
#[test]
fn prop_extract_without_sso_caveat() {
    let config = proptest_config();
    proptest!(config, |(specs in prop::collection::vec(caveat_spec(), 0..10))| {
        let macaroon = macaroon_from(&specs);

        prop_assert_eq!(
            extract_sso_caveat(&macaroon, SSO_HOST),
            Err(StoreAuthError::NoSsoCaveat)
        );
    });
}

/// Property: two or more SSO caveats are always ambiguous, never
/// resolved by position
#[test]
fn prop_extract_multiple_sso_caveats() {
    let config = proptest_config();
    proptest!(config, |(
        specs in prop::collection::vec(caveat_spec(), 0..5),
        ids in prop::collection::vec("[a-z0-9]{1,12}", 2..4)
    )| {
        let mut macaroon = macaroon_from(&specs);
        for (i, id) in ids.iter().enumerate() {
            macaroon.add_third_party_caveat(id.clone(), format!("key{i}"), SSO_HOST);
        }

        prop_assert_eq!(
            extract_sso_caveat(&macaroon, SSO_HOST),
            Err(StoreAuthError::MultipleSsoCaveats)
        );
    });
}

/// Property: a Vid or Cl packet ahead of any Cid fails decoding rather
/// than being silently accepted
#[test]
fn prop_orphan_packet_is_malformed() {
    let config = proptest_config();
    proptest!(config, |(
        orphan_is_vid in any::<bool>(),
        value in "[a-z0-9]{1,12}",
        specs in prop::collection::vec(caveat_spec(), 0..5)
    )| {
        let mut macaroon = macaroon_from(&specs);
        let kind = if orphan_is_vid { PacketKind::Vid } else { PacketKind::Cl };
        macaroon.packets.insert(0, CaveatPacket::new(kind, value));

        let first = macaroon.caveats().next().unwrap();
        prop_assert!(matches!(first, Err(StoreAuthError::MalformedMacaroon(_))));
    });
}

/// Property: binding a discharge is deterministic and always moves the
/// signature away from the unbound one
#[test]
fn prop_binding_deterministic_and_fresh() {
    let config = proptest_config();
    proptest!(config, |(
        root_key in prop::collection::vec(any::<u8>(), 1..64),
        verification_key in prop::collection::vec(any::<u8>(), 1..64),
        root_id in "[a-z0-9]{1,16}",
        caveat_id in "[a-z0-9]{1,16}"
    )| {
        let root = Macaroon::new(&root_key, root_id, None::<String>);
        let discharge = Macaroon::create_discharge(&verification_key, caveat_id, None::<String>);

        let bound1 = root.bind_discharge(&discharge);
        let bound2 = root.bind_discharge(&discharge);

        prop_assert_eq!(&bound1, &bound2);
        prop_assert_ne!(bound1.signature, discharge.signature);
    });
}

/// Property: the base64 wire format round-trips any macaroon
#[test]
fn prop_base64_roundtrip() {
    let config = proptest_config();
    proptest!(config, |(specs in prop::collection::vec(caveat_spec(), 0..10))| {
        let macaroon = macaroon_from(&specs);

        let encoded = macaroon.to_base64().unwrap();
        let decoded = Macaroon::from_base64(&encoded).unwrap();

        prop_assert_eq!(macaroon, decoded);
    });
}

/// Property: a zeroed signature is representable; decoding is purely
/// structural and never consults the signature
#[test]
fn prop_decoding_ignores_signature() {
    let config = proptest_config();
    proptest!(config, |(specs in prop::collection::vec(caveat_spec(), 0..10))| {
        let mut macaroon = macaroon_from(&specs);
        macaroon.signature = [0u8; SIGNATURE_SIZE];

        prop_assert_eq!(macaroon.decoded_caveats().unwrap().len(), specs.len());
    });
}
