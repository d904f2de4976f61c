#![no_main]

use libfuzzer_sys::fuzz_target;
use snapstore_auth::Macaroon;
use snapstore_auth::authorizer::authorization_header;

fuzz_target!(|data: &[u8]| {
    let (a, b) = data.split_at(data.len() / 2);
    let left = String::from_utf8_lossy(a).into_owned();
    let right = String::from_utf8_lossy(b).into_owned();

    // Garbage serializations must error, never panic
    let _ = authorization_header(&left, &right);

    // A genuine pair must always produce a well-formed header
    let mut root = Macaroon::new(b"fuzz key", "store-root", None::<String>);
    root.add_third_party_caveat(left, "sso key", "login.example.com");
    let discharge = Macaroon::create_discharge(b"sso key", right, None::<String>);

    let header = authorization_header(
        &root.to_base64().unwrap(),
        &discharge.to_base64().unwrap(),
    )
    .unwrap();
    assert!(header.starts_with("Macaroon root=\""));
});
