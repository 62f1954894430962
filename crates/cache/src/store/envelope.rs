//! Versioned on-disk representation of a service identity

use chrono::{DateTime, Utc};
use edgescope_core::{Error, Result, ServiceIdentity, STORED_IDENTITY_VERSION};
use serde::{Deserialize, Serialize};

/// Envelope persisted for each cached identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredServiceIdentity {
    pub version: u32,
    pub id: String,
    pub stored_at: DateTime<Utc>,
    pub identity: ServiceIdentity,
}

impl StoredServiceIdentity {
    pub fn new(identity: ServiceIdentity) -> Self {
        Self {
            version: STORED_IDENTITY_VERSION,
            id: identity.id().to_string(),
            stored_at: Utc::now(),
            identity,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::from)
    }

    /// Decode an envelope, rejecting versions newer than this build understands
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let stored: Self = serde_json::from_slice(bytes)?;
        if stored.version > STORED_IDENTITY_VERSION {
            return Err(Error::store(
                "decode",
                format!(
                    "identity '{}' stored with unsupported version {}",
                    stored.id, stored.version
                ),
            ));
        }
        if stored.id != stored.identity.id() {
            return Err(Error::store(
                "decode",
                format!(
                    "envelope id '{}' does not match identity '{}'",
                    stored.id,
                    stored.identity.id()
                ),
            ));
        }
        Ok(stored)
    }

    pub fn into_identity(self) -> ServiceIdentity {
        self.identity
    }
}
