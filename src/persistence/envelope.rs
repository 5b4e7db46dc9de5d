//! Versioned JSON envelope for saved documents

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistenceError;

/// Format version written by this build
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: CURRENT_VERSION,
            payload,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn encode(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse and unwrap, rejecting versions this build cannot read
    pub fn decode(json: &str) -> Result<T, PersistenceError> {
        let envelope: Envelope<T> = serde_json::from_str(json)?;
        if envelope.version == 0 || envelope.version > CURRENT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_current_version() {
        let json = Envelope::new(vec![1u32, 2, 3]).encode().unwrap();
        assert_eq!(Envelope::<Vec<u32>>::decode(&json).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_future_version() {
        let json = r#"{"version":9,"payload":[]}"#;
        let err = Envelope::<Vec<u32>>::decode(json).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = Envelope::<Vec<u32>>::decode("not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }
}
