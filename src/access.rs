use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    universe::Handle,
};

/// Credentials naming a satellite and the API key used against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub satellite_address: String,
    pub api_key: String,
    pub passphrase: String,
}

impl AccessGrant {
    /// hex encoded bincode, the textual form handed around in `UPLINK_0_ACCESS`
    pub fn serialize(&self) -> Result<String> {
        bincode::serialize(self).map(hex::encode).map_err(Error::other)
    }

    pub fn parse(access: &str) -> Result<Self> {
        if access.is_empty() {
            return Err(Error::InvalidArg("access grant is empty".into()));
        }
        let raw = hex::decode(access).map_err(|e| Error::AccessParse(e.to_string()))?;
        bincode::deserialize(&raw).map_err(|e| Error::AccessParse(e.to_string()))
    }
}

/// Parsed access grant registered in the universe.
pub struct Access {
    grant: AccessGrant,
    _handle: Handle,
}

impl Access {
    pub(crate) fn new(grant: AccessGrant, handle: Handle) -> Self {
        Self {
            grant,
            _handle: handle,
        }
    }

    pub fn satellite_address(&self) -> &str {
        &self.grant.satellite_address
    }

    pub fn grant(&self) -> &AccessGrant {
        &self.grant
    }
}

impl std::fmt::Debug for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Access")
            .field("satellite_address", &self.grant.satellite_address)
            .finish_non_exhaustive()
    }
}
