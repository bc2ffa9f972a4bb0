//! Option payloads handed to protocol factories
//!
//! The configuration layer (environment variables, a host file, an
//! embedding application) supplies one [`ProtocolOptions`] per managed
//! hostname: the hostname itself plus the provider-specific fields the
//! chosen profile requires (`userid`/`password`, `token`, ...). Presence
//! of the required fields is checked once, at construction time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Credential and option fields for one managed hostname
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolOptions {
    /// The DNS hostname to keep updated
    pub hostname: String,

    /// Provider-specific fields (`userid`, `password`, `token`, `key`,
    /// and for some providers an endpoint override `url`)
    #[serde(flatten)]
    pub fields: HashMap<String, String>,
}

impl ProtocolOptions {
    /// Options for `hostname` with no fields yet
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up an optional field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Fetch a required field, failing with a configuration error that
    /// names the missing field
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::config(format!("missing required field '{}'", name)))
    }

    /// Verify every field a profile declares as required is present
    pub fn require_all(&self, fields: &[&str]) -> Result<()> {
        for field in fields {
            self.require(field)?;
        }
        Ok(())
    }
}
