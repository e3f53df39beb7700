//! Extension to WHOIS server mappings.
//!
//! Servers for common extensions are built in. Anything else is discovered
//! through an IANA referral by [`WhoisClient`](super::WhoisClient), which
//! falls back to [`DEFAULT_SERVER`] when IANA has no answer.

use std::time::Duration;

/// Standard WHOIS port.
pub const WHOIS_PORT: u16 = 43;

/// IANA root WHOIS server used for referral discovery.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Read timeout for most registries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The Moroccan registry answers slowly.
pub const SLOW_REGISTRY_TIMEOUT: Duration = Duration::from_secs(8);

/// A WHOIS server and how long to wait for its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisServer {
    pub host: String,
    pub timeout: Duration,
}

impl WhoisServer {
    pub fn new<H: Into<String>>(host: H, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }
}

/// Server used when neither the table nor IANA knows the extension.
pub fn default_server() -> WhoisServer {
    WhoisServer::new("whois.registre.ma", SLOW_REGISTRY_TIMEOUT)
}

/// Look up the built-in server for an extension (with or without the dot).
///
/// Every `.ma` hierarchy (`ma`, `net.ma`, `co.ma`, ...) maps to the Moroccan
/// registry.
pub fn whois_server_for(extension: &str) -> Option<WhoisServer> {
    let ext = extension.trim_start_matches('.').to_lowercase();

    if ext == "ma" || ext.ends_with(".ma") {
        return Some(default_server());
    }

    let host = match ext.as_str() {
        "com" | "net" => "whois.verisign-grs.com",
        "org" => "whois.pir.org",
        "info" => "whois.afilias.net",
        "me" => "whois.nic.me",
        "io" => "whois.nic.io",
        "co" => "whois.nic.co",
        "ai" => "whois.nic.ai",
        "dev" | "app" => "whois.nic.google",
        _ => return None,
    };

    Some(WhoisServer::new(host, DEFAULT_TIMEOUT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moroccan_hierarchies() {
        for ext in [".ma", "ma", ".net.ma", "co.ma", ".press.ma"] {
            let server = whois_server_for(ext).unwrap();
            assert_eq!(server.host, "whois.registre.ma");
            assert_eq!(server.timeout, Duration::from_secs(8));
        }
    }

    #[test]
    fn test_builtin_servers() {
        assert_eq!(
            whois_server_for(".com").unwrap().host,
            "whois.verisign-grs.com"
        );
        assert_eq!(whois_server_for("NET").unwrap().host, "whois.verisign-grs.com");
        assert_eq!(whois_server_for(".org").unwrap().host, "whois.pir.org");
        assert_eq!(whois_server_for(".info").unwrap().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(whois_server_for(".xyz").is_none());
        assert!(whois_server_for(".co.uk").is_none());
    }
}
