// # DNS Provider Trait
//
// Defines the capability interface every DNS provider implements, as seen by
// the update scheduler that hosts it.
//
// ## Implementations
//
// - Beget: `ddns-provider-beget` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
// use tokio_util::sync::CancellationToken;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let client = reqwest::Client::new();
//     let cancel = CancellationToken::new();
//
//     let applied = provider
//         .update(&cancel, &client, "203.0.113.5".parse()?)
//         .await?;
//     println!("{} now points to {}", provider.build_domain_name(), applied);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use serde_json::value::RawValue;
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use tokio_util::sync::CancellationToken;

/// IP version(s) a provider entry manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IpVersion {
    /// A records only
    Ipv4,
    /// AAAA records only
    Ipv6,
    /// Both record families
    Ipv4OrIpv6,
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::Ipv4 => f.write_str("ipv4"),
            IpVersion::Ipv6 => f.write_str("ipv6"),
            IpVersion::Ipv4OrIpv6 => f.write_str("ipv4 or ipv6"),
        }
    }
}

/// IPv6 suffix applied on top of a delegated prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Prefix {
    /// Address bits of the suffix
    pub addr: Ipv6Addr,
    /// Prefix length in bits
    pub len: u8,
}

/// One row of the management UI listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlRow {
    /// Link to the managed domain
    pub domain: String,
    /// Owner (subdomain label)
    pub owner: String,
    /// Link to the provider
    pub provider: String,
    /// IP version label
    pub ip_version: String,
}

/// Trait for DNS provider implementations
///
/// Accessors are pure reads of the configuration the provider was built
/// with. [`DnsProvider::update`] is the only operation with side effects.
///
/// # Trust Level: Untrusted
///
/// Providers are isolated integrations:
/// - They only talk to their own API, through the client the caller passes in
/// - They do not retry, back off or schedule; errors go back to the caller
/// - They do not keep state between calls
///
/// # Concurrency
///
/// Instances are independent of each other. A single instance must not run
/// overlapping `update` calls; the scheduler serializes updates per entry.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Registry name of the provider kind (e.g. "beget")
    fn provider_name(&self) -> &'static str;

    /// Domain as shown to the user
    fn domain(&self) -> &str;

    /// Owner (subdomain label) within [`DnsProvider::domain`]
    fn owner(&self) -> &str;

    /// IP version(s) this entry manages
    fn ip_version(&self) -> IpVersion;

    /// IPv6 suffix, if the provider supports suffixing delegated prefixes
    fn ipv6_suffix(&self) -> Option<Ipv6Prefix> {
        None
    }

    /// Whether traffic for this record is proxied by the provider
    fn proxied(&self) -> bool {
        false
    }

    /// Fully qualified name built from owner and domain
    fn build_domain_name(&self) -> String {
        crate::domain::build_domain_name(self.owner(), self.domain())
    }

    /// Deterministic display name, used in logs and the UI
    fn describe(&self) -> String {
        crate::domain::describe(
            self.domain(),
            self.owner(),
            self.provider_name(),
            self.ip_version(),
        )
    }

    /// Presentation row for the management UI
    fn html_row(&self) -> HtmlRow;

    /// Point the managed record at `ip`
    ///
    /// # Parameters
    ///
    /// - `cancel`: Cancels in-flight requests when triggered
    /// - `client`: Pre-configured HTTP client owned by the caller
    /// - `ip`: The new IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The IP that was applied
    /// - `Err(Error)`: If any phase of the update failed; no partial success is reported
    async fn update(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<IpAddr, crate::Error>;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `settings`: Provider-specific raw JSON settings
    /// - `domain`: Display domain
    /// - `owner`: Owner (subdomain label)
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object, or `Error::Config` if the settings are invalid
    fn create(
        &self,
        settings: &RawValue,
        domain: &str,
        owner: &str,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
