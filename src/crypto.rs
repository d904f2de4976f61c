use hmac::{Hmac, Mac};
use sha3::Sha3_256;
use subtle::ConstantTimeEq;

type HmacSha3 = Hmac<Sha3_256>;

/// Size of HMAC-SHA3-256 output in bytes (32 bytes = 256 bits)
pub const SIGNATURE_SIZE: usize = 32;

/// Generates an HMAC-SHA3-256 signature
pub fn hmac_sha3(key: &[u8], message: &[u8]) -> [u8; SIGNATURE_SIZE] {
    let mut mac = HmacSha3::new_from_slice(key).expect("HMAC can take key of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Extends a signature chain with the next caveat packet value
///
/// This computes: HMAC-SHA3(previous_signature, value)
pub fn chain_caveat(signature: &[u8], value: &[u8]) -> [u8; SIGNATURE_SIZE] {
    hmac_sha3(signature, value)
}

/// Constant-time signature comparison
pub fn signatures_equal(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
