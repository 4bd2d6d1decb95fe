//! URL validation
//!
//! Checks run before any network call. The host denylist is a purely
//! lexical comparison against the parsed host: no DNS resolution and no
//! CIDR matching is done, so a public name resolving to a private address,
//! or a redirect to one, is not caught here.
//!
//! The URL must spell out an authority (`scheme://host`). The WHATWG parser
//! would otherwise accept `https:example.com` and `https:/example.com` as
//! having a host.

use crate::error::ValidationError;
use tracing::warn;
use url::{Host, Url};

/// Only scheme accepted by default
pub const DEFAULT_SCHEME: &str = "https";

/// Hosts rejected by default
pub const DEFAULT_DENIED_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1"];

/// Validation rules for target URLs
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    scheme: String,
    denied_hosts: Vec<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            denied_hosts: DEFAULT_DENIED_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl UrlPolicy {
    /// Default policy: `https` only, loopback hosts denied
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed scheme
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into().to_ascii_lowercase();
        self
    }

    /// Add a host to the denylist
    pub fn deny_host(mut self, host: impl AsRef<str>) -> Self {
        let host = normalize_host(host.as_ref());
        if !host.is_empty() && !self.denied_hosts.contains(&host) {
            self.denied_hosts.push(host);
        }
        self
    }

    /// Drop every denylist entry
    pub fn clear_denied_hosts(mut self) -> Self {
        self.denied_hosts.clear();
        self
    }

    /// The allowed scheme
    pub fn allowed_scheme(&self) -> &str {
        &self.scheme
    }

    /// Current denylist
    pub fn denied_hosts(&self) -> &[String] {
        &self.denied_hosts
    }

    /// Validate and parse a candidate URL
    pub fn check(&self, candidate: &str) -> Result<Url, ValidationError> {
        let trimmed = candidate.trim();
        let url = Url::parse(trimmed).map_err(|e| ValidationError::Malformed(e.to_string()))?;

        let has_authority = trimmed
            .get(url.scheme().len()..)
            .is_some_and(|rest| rest.starts_with("://"));
        if !has_authority {
            return Err(ValidationError::MissingHost);
        }

        let host = match url.host() {
            Some(Host::Domain(d)) if !d.is_empty() => normalize_host(d),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            _ => return Err(ValidationError::MissingHost),
        };

        if url.scheme() != self.scheme {
            return Err(ValidationError::DisallowedScheme(url.scheme().to_string()));
        }

        if self.denied_hosts.iter().any(|denied| *denied == host) {
            return Err(ValidationError::DeniedHost(host));
        }

        Ok(url)
    }

    /// Boolean verdict; any failure counts as invalid
    pub fn is_valid(&self, candidate: &str) -> bool {
        match self.check(candidate) {
            Ok(_) => true,
            Err(e) => {
                warn!(url = %candidate, reason = %e, "Rejected URL");
                false
            }
        }
    }
}

fn normalize_host(host: &str) -> String {
    host.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_ascii_lowercase()
}
