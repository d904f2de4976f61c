use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{Macaroon, Result, StoreAuthError};

impl Macaroon {
    /// Serializes this macaroon to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| StoreAuthError::Deserialization(e.to_string()))
    }

    /// Serializes this macaroon to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreAuthError::Deserialization(e.to_string()))
    }

    /// Deserializes a macaroon from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreAuthError::Deserialization(e.to_string()))
    }

    /// Serializes this macaroon to MessagePack binary format
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| StoreAuthError::Deserialization(e.to_string()))
    }

    /// Deserializes a macaroon from MessagePack binary format
    pub fn from_msgpack(data: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(data).map_err(|e| StoreAuthError::Deserialization(e.to_string()))
    }

    /// Serializes this macaroon to a URL-safe, unpadded base64 string
    /// (MessagePack encoding underneath).
    ///
    /// This is the wire form used in stored bundles and in the
    /// `Authorization` header.
    ///
    /// # Example
    /// ```
    /// use snapstore_auth::Macaroon;
    ///
    /// let root = Macaroon::new(b"secret", "store-root", None::<String>);
    /// let encoded = root.to_base64().unwrap();
    /// assert_eq!(Macaroon::from_base64(&encoded).unwrap(), root);
    /// ```
    pub fn to_base64(&self) -> Result<String> {
        let msgpack = self.to_msgpack()?;
        Ok(URL_SAFE_NO_PAD.encode(&msgpack))
    }

    /// Deserializes a macaroon from a base64-encoded string
    pub fn from_base64(b64: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(b64.as_bytes())
            .map_err(|e| StoreAuthError::Deserialization(e.to_string()))?;

        Self::from_msgpack(&bytes)
    }

    /// Serializes this macaroon to a hex string (MessagePack encoding)
    pub fn to_hex(&self) -> Result<String> {
        let msgpack = self.to_msgpack()?;
        Ok(hex::encode(&msgpack))
    }

    /// Deserializes a macaroon from a hex string (MessagePack encoding)
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let msgpack =
            hex::decode(hex_str).map_err(|e| StoreAuthError::Deserialization(e.to_string()))?;
        Self::from_msgpack(&msgpack)
    }
}
