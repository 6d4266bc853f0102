//! Security check collaborator
//!
//! Decides whether the deployment serving the web app is reachable from the
//! public internet. The result feeds the setup form's security-check field.

use crate::state::SecurityCheckStatus;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use url::{Host, Url};

const DNS_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait SecurityCheck: Send + Sync {
    async fn run(&self) -> SecurityCheckStatus;
}

/// Checks the host of the configured web app URL
#[derive(Debug, Clone)]
pub struct HostSecurityCheck {
    webapp_url: Option<String>,
}

impl HostSecurityCheck {
    pub fn new(webapp_url: Option<String>) -> Self {
        Self { webapp_url }
    }

    /// Host (without port) being checked, if the URL could be parsed
    pub fn host(&self) -> Option<String> {
        self.webapp_url
            .as_deref()
            .and_then(parse_host)
            .map(|(host, _)| host_name(&host))
    }
}

#[async_trait]
impl SecurityCheck for HostSecurityCheck {
    async fn run(&self) -> SecurityCheckStatus {
        let Some((host, port)) = self.webapp_url.as_deref().and_then(parse_host) else {
            tracing::warn!("Security check skipped: no usable web app URL configured");
            return SecurityCheckStatus::CheckFailed;
        };

        let status = match &host {
            Host::Ipv4(ip) => classify_addrs(&[IpAddr::V4(*ip)]),
            Host::Ipv6(ip) => classify_addrs(&[IpAddr::V6(*ip)]),
            Host::Domain(name) if is_local_name(name) => SecurityCheckStatus::Succeeded,
            Host::Domain(name) => resolve(name, port).await,
        };
        tracing::info!("Security check for {host}: {status:?}");
        status
    }
}

/// Parse a web app URL into its host and port. A URL without a scheme is
/// read as `http://`; only http and https are accepted.
pub(crate) fn parse_host(raw: &str) -> Option<(Host<String>, u16)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains("://") {
        trimmed.parse::<Url>()
    } else {
        format!("http://{trimmed}").parse::<Url>()
    }
    .ok()?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let port = parsed.port_or_known_default()?;
    Some((parsed.host()?.to_owned(), port))
}

/// Host as shown to the user, IPv6 without brackets
fn host_name(host: &Host<String>) -> String {
    match host {
        Host::Domain(name) => name.clone(),
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    }
}

fn is_local_name(name: &str) -> bool {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    name == "localhost" || name.ends_with(".localhost") || name.ends_with(".local")
}

async fn resolve(name: &str, port: u16) -> SecurityCheckStatus {
    let lookup = tokio::net::lookup_host((name, port));
    match tokio::time::timeout(DNS_TIMEOUT, lookup).await {
        Ok(Ok(addrs)) => {
            let addrs: Vec<IpAddr> = addrs.map(|a| a.ip()).collect();
            tracing::debug!("{name} resolved to {} addresses", addrs.len());
            classify_addrs(&addrs)
        }
        Ok(Err(e)) => {
            tracing::warn!("Security check could not resolve {name}: {e}");
            SecurityCheckStatus::CheckFailed
        }
        Err(_) => {
            tracing::warn!("Security check timed out resolving {name}");
            SecurityCheckStatus::CheckFailed
        }
    }
}

fn classify_addrs(addrs: &[IpAddr]) -> SecurityCheckStatus {
    if addrs.is_empty() {
        SecurityCheckStatus::CheckFailed
    } else if addrs.iter().all(is_internal) {
        SecurityCheckStatus::Succeeded
    } else {
        SecurityCheckStatus::Failed
    }
}

fn is_internal(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_internal_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_internal_v4(&v4),
            None => is_internal_v6(v6),
        },
    }
}

fn is_internal_v4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_internal_v6(ip: &Ipv6Addr) -> bool {
    ip.is_loopback() || ip.is_unspecified() || ip.is_unique_local() || ip.is_unicast_link_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parsed(url: &str) -> Option<(String, u16)> {
        parse_host(url).map(|(host, port)| (host_name(&host), port))
    }

    #[test]
    fn test_parse_host() {
        assert_eq!(
            parsed("http://localhost:8000/setup"),
            Some(("localhost".to_string(), 8000))
        );
        assert_eq!(
            parsed("https://app.example.com"),
            Some(("app.example.com".to_string(), 443))
        );
        assert_eq!(
            parsed("example.com/path?x=1"),
            Some(("example.com".to_string(), 80))
        );
        assert_eq!(
            parsed("localhost:3000"),
            Some(("localhost".to_string(), 3000))
        );
        assert_eq!(
            parsed("http://user:pw@10.0.0.5:9000"),
            Some(("10.0.0.5".to_string(), 9000))
        );
        assert_eq!(parsed("http://[::1]:8000/"), Some(("::1".to_string(), 8000)));
        assert_eq!(parsed("https://[fd00::1]"), Some(("fd00::1".to_string(), 443)));
    }

    #[test]
    fn test_parse_host_normalizes() {
        assert_eq!(
            parsed("HTTP://LocalHost:8000"),
            Some(("localhost".to_string(), 8000))
        );
        assert_eq!(
            parsed("Https://app.example.com"),
            Some(("app.example.com".to_string(), 443))
        );
        assert_eq!(
            parsed("http://127.0.0.1.:8000"),
            Some(("127.0.0.1".to_string(), 8000))
        );
        assert_eq!(
            parsed("http://localhost:8000\\setup"),
            Some(("localhost".to_string(), 8000))
        );
    }

    #[test]
    fn test_parse_host_rejects_garbage() {
        assert_eq!(parsed(""), None);
        assert_eq!(parsed("http://"), None);
        assert_eq!(parsed("ftp://example.com"), None);
        assert_eq!(parsed("http://host:notaport"), None);
        assert_eq!(parsed("http://:80"), None);
    }

    #[test]
    fn test_local_names() {
        assert!(is_local_name("localhost"));
        assert!(is_local_name("localhost."));
        assert!(is_local_name("box.local"));
        assert!(is_local_name("api.localhost"));
        assert!(!is_local_name("example.com"));
    }

    #[test]
    fn test_internal_addresses() {
        let internal = ["127.0.0.1", "192.168.1.10", "::1", "fe80::1", "fd00::1"];
        for ip in internal {
            let ip: IpAddr = ip.parse().unwrap();
            assert!(is_internal(&ip), "{ip} should be internal");
        }
        let public = ["8.8.8.8", "2001:4860:4860::8888"];
        for ip in public {
            let ip: IpAddr = ip.parse().unwrap();
            assert!(!is_internal(&ip), "{ip} should be public");
        }
    }

    #[test]
    fn test_mixed_addresses_fail() {
        let addrs: Vec<IpAddr> = vec!["10.0.0.1".parse().unwrap(), "1.1.1.1".parse().unwrap()];
        assert_eq!(classify_addrs(&addrs), SecurityCheckStatus::Failed);
        assert_eq!(classify_addrs(&[]), SecurityCheckStatus::CheckFailed);
    }

    #[test]
    fn test_ipv4_mapped() {
        let ip: IpAddr = "::ffff:192.168.0.1".parse().unwrap();
        assert!(is_internal(&ip));
    }

    #[tokio::test]
    async fn test_run_without_url() {
        let check = HostSecurityCheck::new(None);
        assert_eq!(check.run().await, SecurityCheckStatus::CheckFailed);
        assert_eq!(check.host(), None);
    }

    #[tokio::test]
    async fn test_run_local_and_public() {
        let local = HostSecurityCheck::new(Some("http://localhost:8000".to_string()));
        assert_eq!(local.run().await, SecurityCheckStatus::Succeeded);
        assert_eq!(local.host().as_deref(), Some("localhost"));

        let public = HostSecurityCheck::new(Some("http://8.8.8.8".to_string()));
        assert_eq!(public.run().await, SecurityCheckStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_accepts_mixed_case_scheme_and_trailing_dot() {
        let upper = HostSecurityCheck::new(Some("HTTP://localhost:8000".to_string()));
        assert_eq!(upper.run().await, SecurityCheckStatus::Succeeded);

        let dotted = HostSecurityCheck::new(Some("http://127.0.0.1.:8000".to_string()));
        assert_eq!(dotted.run().await, SecurityCheckStatus::Succeeded);
        assert_eq!(dotted.host().as_deref(), Some("127.0.0.1"));

        let public = HostSecurityCheck::new(Some("HTTPS://8.8.8.8".to_string()));
        assert_eq!(public.run().await, SecurityCheckStatus::Failed);
    }

    #[tokio::test]
    async fn test_run_unresolvable_host() {
        let check = HostSecurityCheck::new(Some("http://does-not-exist.invalid".to_string()));
        assert_eq!(check.run().await, SecurityCheckStatus::CheckFailed);
    }
}
