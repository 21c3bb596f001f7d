//! Configuration types for the DDNS system
//!
//! A host hands every provider entry to the registry as a [`ProviderConfig`]:
//! the provider kind, the display domain and owner, and the provider-specific
//! settings kept as raw JSON until the matching factory parses them.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// DNS provider entry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider kind, used as the registry key (e.g. "beget")
    pub provider: String,

    /// Display domain (may have the subdomain stripped by the host)
    pub domain: String,

    /// Owner (subdomain label), "@" for the zone apex
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Provider-specific settings, parsed by the provider factory
    pub settings: Box<RawValue>,
}

impl ProviderConfig {
    /// Create a new provider entry from a raw settings JSON document
    pub fn new(
        provider: impl Into<String>,
        domain: impl Into<String>,
        owner: impl Into<String>,
        settings: &str,
    ) -> Result<Self, crate::Error> {
        let settings = RawValue::from_string(settings.to_string())
            .map_err(|e| crate::Error::config(format!("provider settings are not valid JSON: {e}")))?;

        Ok(Self {
            provider: provider.into(),
            domain: domain.into(),
            owner: owner.into(),
            settings,
        })
    }

    /// Validate the fields the core relies on
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.provider.is_empty() {
            return Err(crate::Error::config("provider kind cannot be empty"));
        }
        if self.domain.is_empty() {
            return Err(crate::Error::config("domain cannot be empty"));
        }
        Ok(())
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        &self.provider
    }
}

fn default_owner() -> String {
    "@".to_string()
}
