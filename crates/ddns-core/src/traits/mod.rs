//! Core traits for the DDNS system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DnsProvider`]: Update DNS records via provider APIs
//! - [`DnsProviderFactory`]: Build providers from raw configuration

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory, HtmlRow, IpVersion, Ipv6Prefix};
