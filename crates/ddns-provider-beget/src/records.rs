//! In-memory record set of a Beget domain.
//!
//! `changeRecords` replaces the complete record set of a domain, so the set
//! fetched by `getData` is carried over as-is and only its `A` entry is
//! rewritten. Entries of other types stay raw JSON and are sent back byte for
//! byte.

use ddns_core::Result;
use serde::Serialize;
use serde_json::value::{RawValue, to_raw_value};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Record type key this provider manages
pub const A_RECORD: &str = "A";

/// One entry of the `A` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ARecord {
    /// Opaque provider-specific priority
    pub priority: i64,
    /// Address in dotted-quad form
    pub value: String,
}

/// Record type name → type-specific raw value
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    entries: BTreeMap<String, Box<RawValue>>,
}

impl RecordSet {
    /// Wrap a fetched record mapping
    pub fn new(entries: BTreeMap<String, Box<RawValue>>) -> Self {
        Self { entries }
    }

    /// Replace whatever `A` records exist with exactly one record for `ip`
    pub fn set_a_record(&mut self, priority: i64, ip: Ipv4Addr) -> Result<()> {
        let records = [ARecord {
            priority,
            value: ip.to_string(),
        }];
        self.entries
            .insert(A_RECORD.to_string(), to_raw_value(&records)?);
        Ok(())
    }

    /// Raw value stored under `record_type`
    pub fn get(&self, record_type: &str) -> Option<&RawValue> {
        self.entries.get(record_type).map(|raw| raw.as_ref())
    }

    /// Record types present, in key order
    pub fn record_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
