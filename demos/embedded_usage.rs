//! Minimal embedding example for ddns-core
//!
//! This example plays the part of the update scheduler: it registers
//! providers, builds them from a JSON configuration by name, lists them the
//! way a management UI would and drives one update. Only the in-process
//! provider is updated, so the example makes no network calls.

use ddns_core::traits::{DnsProvider, DnsProviderFactory, HtmlRow, IpVersion};
use ddns_core::{ProviderConfig, ProviderRegistry, Result};
use serde_json::value::RawValue;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Custom DNS provider for embedded usage
struct EmbeddedProvider {
    domain: String,
    owner: String,
    update_calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl DnsProvider for EmbeddedProvider {
    fn provider_name(&self) -> &'static str {
        "embedded"
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
            provider: "Embedded".to_string(),
            ip_version: self.ip_version().to_string(),
        }
    }

    async fn update(
        &self,
        _cancel: &CancellationToken,
        _client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] Updating {} -> {}", self.build_domain_name(), ip);
        Ok(ip)
    }
}

struct EmbeddedFactory {
    update_calls: Arc<AtomicUsize>,
}

impl DnsProviderFactory for EmbeddedFactory {
    fn create(&self, _settings: &RawValue, domain: &str, owner: &str) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(EmbeddedProvider {
            domain: domain.to_string(),
            owner: owner.to_string(),
            update_calls: Arc::clone(&self.update_calls),
        }))
    }
}

const CONFIG: &str = r#"[
    {
        "provider": "beget",
        "domain": "example.com",
        "owner": "home",
        "settings": {"login": "user", "password": "secret", "domain": "home.example.com", "priority": 10}
    },
    {
        "provider": "embedded",
        "domain": "example.org",
        "owner": "@",
        "settings": {}
    }
]"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Embedded ddns-core Example ===\n");

    // Register providers
    println!("1. Registering providers...");
    let update_calls = Arc::new(AtomicUsize::new(0));
    let registry = ProviderRegistry::new();
    ddns_provider_beget::register(&registry);
    registry.register_provider(
        "embedded",
        Box::new(EmbeddedFactory {
            update_calls: Arc::clone(&update_calls),
        }),
    );
    println!("   Registered: {:?}", registry.list_providers());

    // Build providers from configuration
    println!("2. Building providers from configuration...");
    let entries: Vec<ProviderConfig> = serde_json::from_str(CONFIG)?;
    let mut providers = Vec::with_capacity(entries.len());
    for entry in &entries {
        providers.push(registry.create_provider(entry)?);
    }

    // List them
    println!("3. Configured entries:");
    for provider in &providers {
        let row = provider.html_row();
        println!("   {}", provider.describe());
        println!("     row: {} | {} | {} | {}", row.domain, row.owner, row.provider, row.ip_version);
    }

    // Drive one update; the scheduler owns the client and the cancellation token
    println!("4. Updating the embedded entry...");
    let client = reqwest::Client::new();
    let cancel = CancellationToken::new();
    let ip: IpAddr = "192.0.2.44".parse()?;
    for provider in providers.iter().filter(|p| p.provider_name() == "embedded") {
        let applied = provider.update(&cancel, &client, ip).await?;
        println!("   {} now points to {}", provider.build_domain_name(), applied);
    }

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Providers are selected by name through the registry");
    println!("- No global state: each provider owns its configuration");
    println!("- The host owns the HTTP client, cancellation and retry policy");
    println!("- Updates performed: {}", update_calls.load(Ordering::SeqCst));

    Ok(())
}
