// # ddns-core
//
// Core library for the DDNS provider system.
//
// ## Architecture Overview
//
// This library provides the pieces every DNS provider plugs into:
// - **DnsProvider**: Capability trait the update scheduler drives
// - **DnsProviderFactory**: Builds a provider from raw configuration
// - **ProviderRegistry**: Plugin-based registry keyed by provider name
// - **domain**: Domain validation and display helpers
//
// Scheduling, retries and IP detection belong to the host process. A
// provider receives the HTTP client, a cancellation token and the new IP,
// and reports back the IP it applied.
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core contracts are separate from implementations
// 2. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 3. **Library-First**: Everything is usable from an embedding host
// 4. **No Global State**: Each provider instance owns its configuration

pub mod config;
pub mod domain;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory, HtmlRow, IpVersion, Ipv6Prefix};
