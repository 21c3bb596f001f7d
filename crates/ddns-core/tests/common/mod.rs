//! Test doubles and common utilities for the provider contract tests
//!
//! This module provides a minimal provider that records its calls without
//! talking to any API.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, HtmlRow, IpVersion};
use serde_json::value::RawValue;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// A provider that records update calls
pub struct RecordingProvider {
    domain: String,
    owner: String,
    /// Reject every update with a provider-side error
    fail: bool,
    update_call_count: Arc<AtomicUsize>,
}

impl RecordingProvider {
    pub fn new(domain: &str, owner: &str, fail: bool, update_call_count: Arc<AtomicUsize>) -> Self {
        Self {
            domain: domain.to_string(),
            owner: owner.to_string(),
            fail,
            update_call_count,
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    fn provider_name(&self) -> &'static str {
        "recording"
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn ip_version(&self) -> IpVersion {
        IpVersion::Ipv4OrIpv6
    }

    fn html_row(&self) -> HtmlRow {
        HtmlRow {
            domain: self.build_domain_name(),
            owner: self.owner.clone(),
            provider: "Recording".to_string(),
            ip_version: self.ip_version().to_string(),
        }
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(Error::cancelled("recording/update"));
        }
        if self.fail {
            return Err(Error::reconciliation("recording/update", "rejected"));
        }
        Ok(ip)
    }
}

/// Factory reading `{"fail": bool}` settings
pub struct RecordingFactory {
    pub update_call_count: Arc<AtomicUsize>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            update_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times update() was called on created providers
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Create a new factory whose providers share this one's counter
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            update_call_count: Arc::clone(&other.update_call_count),
        }
    }
}

#[derive(serde::Deserialize)]
struct RecordingSettings {
    #[serde(default)]
    fail: bool,
}

impl DnsProviderFactory for RecordingFactory {
    fn create(&self, settings: &RawValue, domain: &str, owner: &str) -> Result<Box<dyn DnsProvider>> {
        let settings: RecordingSettings = serde_json::from_str(settings.get())
            .map_err(|e| Error::config(format!("invalid recording settings: {e}")))?;

        Ok(Box::new(RecordingProvider::new(
            domain,
            owner,
            settings.fail,
            Arc::clone(&self.update_call_count),
        )))
    }
}
