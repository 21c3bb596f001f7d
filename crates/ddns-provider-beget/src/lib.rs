// # Beget DNS Provider
//
// This crate provides a Beget DNS provider implementation for the DDNS system.
// It manages exactly one A record of one domain.
//
// ## How an update works
//
// Beget has no call that updates a single record: `changeRecords` replaces
// the *entire* record set of a domain. An update is therefore a
// read-modify-write reconciliation:
//
// 1. `getData` fetches the complete record set of the target FQDN
// 2. The `A` entry is replaced by a single record for the new IP
// 3. `changeRecords` writes the merged set back
//
// If the fetch does not report success for exactly our FQDN, nothing is
// written: writing an empty or unreliable set would wipe every other record
// of the domain.
//
// ## Known race
//
// Between the fetch and the write another client may change the record set.
// The last successful write wins, and records changed concurrently by that
// client can be overwritten with the values we fetched. Beget offers no
// locking or conditional write, so this is accepted rather than worked around.
//
// ## Architectural Constraints
//
// - Exactly two API calls per update, no retries (owned by the scheduler)
// - No background tasks, no state kept between updates
// - Overlapping `update` calls on the same instance are not supported; the
//   scheduler must serialize them
//
// ## Security Requirements
//
// - Login and password NEVER appear in logs or in `Debug` output
//
// ## API Reference
//
// - Beget DNS API: https://beget.com/en/kb/api/dns-administration-functions
// - Get DNS data: GET `/api/dns/getData`
// - Change records: GET `/api/dns/changeRecords`

mod api;
pub mod records;

use api::{
    BEGET_API_BASE, CHANGE_RECORDS_ENDPOINT, ChangeRecordsResponse, GET_DATA_ENDPOINT,
    GetDataResponse,
};
use async_trait::async_trait;
use ddns_core::domain::check_domain;
use ddns_core::error::to_single_line;
use ddns_core::traits::{DnsProvider, DnsProviderFactory, HtmlRow, IpVersion};
use ddns_core::{Error, Result};
use records::RecordSet;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::net::{IpAddr, Ipv4Addr};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Registry name of this provider
pub const PROVIDER_NAME: &str = "beget";

/// Provider-specific settings as found in the configuration
#[derive(Deserialize)]
struct BegetSettings {
    #[serde(default)]
    login: String,
    #[serde(default)]
    password: String,
    /// Full FQDN; the host-supplied domain may have the subdomain stripped
    #[serde(default)]
    domain: String,
    #[serde(default)]
    priority: i64,
}

/// `getData` input
#[derive(Serialize)]
struct GetDataInput<'a> {
    fqdn: &'a str,
}

/// `changeRecords` input
#[derive(Serialize)]
struct ChangeRecordsInput<'a> {
    fqdn: &'a str,
    records: &'a RecordSet,
}

/// Beget DNS provider
///
/// Holds the configuration of one managed A record. Immutable after
/// construction.
pub struct BegetProvider {
    /// Display domain, as handed over by the host
    domain: String,

    /// Unstripped FQDN used in every API call
    target: String,

    /// Owner (subdomain label)
    owner: String,

    /// API login
    login: String,

    /// API password
    /// ⚠️ NEVER log this value
    password: String,

    /// Priority written into the A record, passed through as-is
    priority: i64,

    /// API base URL (the real Beget API unless overridden)
    api_base: Url,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for BegetProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BegetProvider")
            .field("domain", &self.domain)
            .field("target", &self.target)
            .field("owner", &self.owner)
            .field("login", &self.login)
            .field("password", &"<REDACTED>")
            .field("priority", &self.priority)
            .finish()
    }
}

impl BegetProvider {
    /// Create a new Beget provider from its raw JSON settings
    ///
    /// # Parameters
    ///
    /// - `settings`: `{"login", "password", "domain", "priority"}`
    /// - `domain`: Display domain supplied by the host
    /// - `owner`: Owner (subdomain label) supplied by the host
    ///
    /// # Errors
    ///
    /// `Error::Config` if the settings are malformed, the `domain` setting is
    /// not a valid FQDN, or a credential is empty. No instance is produced.
    pub fn new(settings: &RawValue, domain: &str, owner: &str) -> Result<Self> {
        let settings: BegetSettings = serde_json::from_str(settings.get())
            .map_err(|e| Error::config(format!("invalid Beget settings: {e}")))?;

        check_domain(&settings.domain)?;

        if settings.login.is_empty() {
            return Err(Error::config("Beget login cannot be empty"));
        }
        if settings.password.is_empty() {
            return Err(Error::config("Beget password cannot be empty"));
        }

        let api_base = Url::parse(BEGET_API_BASE)
            .map_err(|e| Error::config(format!("invalid Beget API base URL: {e}")))?;

        // Compared verbatim against the fetched fqdn, which has no trailing dot
        let target = match settings.domain.strip_suffix('.') {
            Some(name) => name.to_string(),
            None => settings.domain,
        };

        Ok(Self {
            domain: domain.to_string(),
            target,
            owner: owner.to_string(),
            login: settings.login,
            password: settings.password,
            priority: settings.priority,
            api_base,
        })
    }

    /// Set the API base URL (useful for testing)
    ///
    /// `base` should be an origin such as `http://127.0.0.1:8080`; endpoint
    /// paths are resolved against it.
    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        self.api_base =
            Url::parse(base).map_err(|e| Error::config(format!("invalid API base URL: {e}")))?;
        Ok(self)
    }

    /// Unstripped FQDN sent to the API
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Priority written into the A record
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Authenticated call of `endpoint` with `input` as JSON input data
    async fn call<T: Serialize>(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
        endpoint: &str,
        input: &T,
    ) -> Result<Vec<u8>> {
        let input = serde_json::to_vec(input)?;
        let request = api::build_request(
            client,
            &self.api_base,
            endpoint,
            &self.login,
            &self.password,
            &input,
        )?;
        api::execute(cancel, client, endpoint, request).await
    }

    /// Fetch the complete record set of the target FQDN
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /api/dns/getData?...&input_data={"fqdn":"<target>"}
    /// ```
    async fn fetch_records(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
    ) -> Result<RecordSet> {
        let body = self
            .call(cancel, client, GET_DATA_ENDPOINT, &GetDataInput { fqdn: &self.target })
            .await?;

        let envelope: GetDataResponse = api::decode(GET_DATA_ENDPOINT, &body)?;
        if !envelope.is_success() {
            tracing::warn!("Beget getData did not report success for {}", self.target);
            return Err(Error::reconciliation(
                GET_DATA_ENDPOINT,
                "response doesn't indicate success",
            ));
        }

        let data = envelope.into_result().ok_or_else(|| {
            Error::reconciliation(GET_DATA_ENDPOINT, "response has no result")
        })?;

        if data.fqdn != self.target {
            tracing::warn!(
                "Beget getData answered for {:?} instead of {:?}",
                data.fqdn,
                self.target
            );
            return Err(Error::reconciliation(
                GET_DATA_ENDPOINT,
                format!(
                    "response is for {:?}, expected {:?}",
                    data.fqdn, self.target
                ),
            ));
        }

        let records = data.records.ok_or_else(|| {
            Error::reconciliation(GET_DATA_ENDPOINT, "response has no record set")
        })?;

        tracing::debug!(
            "Fetched {} record type(s) for {}",
            records.len(),
            self.target
        );
        Ok(RecordSet::new(records))
    }

    /// Write `records` back as the complete record set of the target FQDN
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /api/dns/changeRecords?...&input_data={"fqdn":"<target>","records":{...}}
    /// ```
    async fn write_records(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
        records: &RecordSet,
    ) -> Result<()> {
        let input = ChangeRecordsInput {
            fqdn: &self.target,
            records,
        };
        let body = self
            .call(cancel, client, CHANGE_RECORDS_ENDPOINT, &input)
            .await?;

        let envelope: ChangeRecordsResponse = api::decode(CHANGE_RECORDS_ENDPOINT, &body)?;
        if !envelope.is_success() {
            let body = to_single_line(&String::from_utf8_lossy(&body));
            tracing::warn!("Beget changeRecords rejected for {}: {}", self.target, body);
            return Err(Error::reconciliation(
                CHANGE_RECORDS_ENDPOINT,
                format!("response doesn't indicate success: {body}"),
            ));
        }

        Ok(())
    }

    async fn reconcile(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
        ip: Ipv4Addr,
    ) -> Result<()> {
        let mut records = self.fetch_records(cancel, client).await?;
        records.set_a_record(self.priority, ip)?;
        self.write_records(cancel, client, &records).await
    }
}

#[async_trait]
impl DnsProvider for BegetProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn ip_version(&self) -> IpVersion {
        IpVersion::Ipv4
    }

    fn html_row(&self) -> HtmlRow {
        let name = self.build_domain_name();
        HtmlRow {
            domain: format!("<a href=\"http://{name}\">{name}</a>"),
            owner: self.owner.clone(),
            provider: "<a href=\"https://beget.com\">Beget</a>".to_string(),
            ip_version: IpVersion::Ipv4.to_string(),
        }
    }

    /// Point the A record of the target FQDN at `ip`
    ///
    /// Fetches the full record set, replaces the `A` entry with a single
    /// record and writes the set back. Returns `ip` once the write is
    /// confirmed. Only IPv4 addresses are accepted.
    async fn update(
        &self,
        cancel: &CancellationToken,
        client: &reqwest::Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        let IpAddr::V4(ipv4) = ip else {
            return Err(Error::invalid_input(format!(
                "Beget provider only manages A records, got IPv6 address {ip}"
            )));
        };

        tracing::info!("Updating Beget A record: {} -> {}", self.target, ipv4);

        self.reconcile(cancel, client, ipv4).await?;

        tracing::info!("Beget A record updated successfully: {} -> {}", self.target, ipv4);
        Ok(ip)
    }
}

/// Factory for creating Beget providers
pub struct BegetFactory;

impl DnsProviderFactory for BegetFactory {
    fn create(&self, settings: &RawValue, domain: &str, owner: &str) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(BegetProvider::new(settings, domain, owner)?))
    }
}

/// Register the Beget provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_beget::register(&registry);
/// assert!(registry.has_provider("beget"));
/// ```
pub fn register(registry: &ddns_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(BegetFactory));
}
