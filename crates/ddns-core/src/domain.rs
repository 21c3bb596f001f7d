//! Domain name helpers shared by all providers
//!
//! - [`check_domain`]: syntactic validation of a fully qualified domain name
//! - [`build_domain_name`]: compose owner + domain for display
//! - [`describe`]: deterministic one-line identity of a provider entry

use crate::error::{Error, Result};
use crate::traits::IpVersion;

/// Maximum length of a domain name in presentation format
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// Validate that `domain` is a syntactically valid FQDN.
///
/// Labels may contain ASCII letters, digits, `-` and `_` (the latter shows up
/// in SRV/DKIM style names), must not start or end with `-`, and the last
/// label must end with a letter. A single trailing dot is accepted.
pub fn check_domain(domain: &str) -> Result<()> {
    let name = domain.strip_suffix('.').unwrap_or(domain);

    if name.is_empty() {
        return Err(Error::config("domain name is empty"));
    }
    if name.len() > MAX_DOMAIN_LEN {
        return Err(Error::config(format!(
            "domain name {name:?} is longer than {MAX_DOMAIN_LEN} characters"
        )));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err(Error::config(format!(
            "domain name {name:?} has no top level domain"
        )));
    }

    for label in &labels {
        check_label(name, label)?;
    }

    let tld = labels[labels.len() - 1];
    if !tld.ends_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(Error::config(format!(
            "domain name {name:?} has an invalid top level domain {tld:?}"
        )));
    }

    Ok(())
}

fn check_label(name: &str, label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::config(format!(
            "domain name {name:?} contains an empty label"
        )));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(Error::config(format!(
            "label {label:?} of {name:?} is longer than {MAX_LABEL_LEN} characters"
        )));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::config(format!(
            "label {label:?} of {name:?} starts or ends with a hyphen"
        )));
    }
    if let Some(c) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(Error::config(format!(
            "label {label:?} of {name:?} contains invalid character {c:?}"
        )));
    }
    Ok(())
}

/// Compose the fully qualified name of `owner` within `domain`.
///
/// `@` is the zone apex and `*` the wildcard, which is shown as `any`.
pub fn build_domain_name(owner: &str, domain: &str) -> String {
    match owner {
        "@" | "" => domain.to_string(),
        "*" => format!("any.{domain}"),
        _ => format!("{owner}.{domain}"),
    }
}

/// Deterministic display name for a provider entry
pub fn describe(domain: &str, owner: &str, provider: &str, ip_version: IpVersion) -> String {
    format!("[domain: {domain} | owner: {owner} | provider: {provider} | ip: {ip_version}]")
}
