//! Call data - opaque payload forwarded to a destination account
//!
//! The engine never interprets call data. Contracts hosted by the ledger
//! decode it themselves; the built-in ones use JSON via `encode`/`decode`.

use crate::error::CoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque bytes. Text form is `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CallData(Vec<u8>);

impl CallData {
    /// Empty payload (plain value transfer)
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encode a JSON call for one of the ledger's hosted contracts
    pub fn encode<T: Serialize>(call: &T) -> Result<Self, CoreError> {
        serde_json::to_vec(call)
            .map(Self)
            .map_err(|e| CoreError::InvalidCallData(e.to_string()))
    }

    /// Decode a JSON call
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        serde_json::from_slice(&self.0).map_err(|e| CoreError::InvalidCallData(e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CallData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for CallData {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits)
            .map(Self)
            .map_err(|e| CoreError::InvalidCallData(e.to_string()))
    }
}

impl TryFrom<String> for CallData {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CallData> for String {
    fn from(data: CallData) -> Self {
        data.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SetValue {
        value: u64,
    }

    #[test]
    fn test_encode_decode_json_call() {
        let data = CallData::encode(&SetValue { value: 123 }).unwrap();
        assert!(!data.is_empty());
        let call: SetValue = data.decode().unwrap();
        assert_eq!(call, SetValue { value: 123 });
    }

    #[test]
    fn test_hex_text_form() {
        let data = CallData::from_bytes(vec![0xde, 0xad]);
        assert_eq!(data.to_string(), "0xdead");
        assert_eq!("0xdead".parse::<CallData>().unwrap(), data);
        assert_eq!("0x".parse::<CallData>().unwrap(), CallData::empty());
    }

    #[test]
    fn test_decode_garbage() {
        let data = CallData::from_bytes(vec![0xff]);
        assert!(matches!(
            data.decode::<SetValue>(),
            Err(CoreError::InvalidCallData(_))
        ));
    }
}
