#![no_main]

use libfuzzer_sys::fuzz_target;
use snapstore_auth::Macaroon;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic any of the wire-format parsers
    let _ = Macaroon::from_msgpack(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Macaroon::from_json(text);
        let _ = Macaroon::from_base64(text);
        let _ = Macaroon::from_hex(text);
    }

    // A macaroon minted from fuzz input must survive the wire format
    let identifier = String::from_utf8_lossy(data).into_owned();
    let mut root = Macaroon::new(b"fuzz key", identifier.clone(), None::<String>);
    root.add_first_party_caveat(identifier);

    let encoded = root.to_base64().unwrap();
    assert_eq!(Macaroon::from_base64(&encoded).unwrap(), root);
});
