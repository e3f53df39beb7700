//! WHOIS protocol implementation for domain availability checking.
//!
//! Queries go straight to the registry over TCP port 43: connect, send
//! `domain\r\n`, read until the server closes the connection. The free-text
//! answer is classified by phrase matching, since registries do not share a
//! response format.

use super::registry::{
    default_server, whois_server_for, WhoisServer, DEFAULT_TIMEOUT, IANA_WHOIS_SERVER, WHOIS_PORT,
};
use super::{RegistrationStatus, RegistryLookup};
use crate::error::SuggestError;
use crate::utils::extract_extension;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Phrases registries use for unregistered names.
const AVAILABLE_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain available",
    "status: available",
    "status: free",
    "not registered",
    "no matching record",
    "no object found",
    "object does not exist",
    "this domain name has not been registered",
];

/// Phrases that only appear in a record for a registered name.
const REGISTERED_PATTERNS: &[&str] = &[
    "creation date",
    "created on",
    "registered on",
    "registration date",
    "domain status: ok",
    "status: active",
    "registrar:",
    "registry domain id:",
    "name server:",
    "expiry date:",
];

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "try again later",
    "quota exceeded",
    "limit exceeded",
    "throttled",
    "rate-limited",
];

/// Timeout for IANA referral queries.
const REFERRAL_TIMEOUT: Duration = Duration::from_secs(10);

/// WHOIS client speaking the protocol directly over TCP.
///
/// Referral discoveries are remembered per TLD for the life of the client,
/// including negative answers.
#[derive(Clone)]
pub struct WhoisClient {
    port: u16,
    iana_server: String,
    server_override: Option<WhoisServer>,
    rate_limit_delay: Duration,
    referrals: Arc<Mutex<HashMap<String, Option<String>>>>,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            port: WHOIS_PORT,
            iana_server: IANA_WHOIS_SERVER.to_string(),
            server_override: None,
            rate_limit_delay: Duration::from_millis(1000),
            referrals: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Send every query to `server`, skipping the table and referrals.
    pub fn with_server(mut self, server: WhoisServer) -> Self {
        self.server_override = Some(server);
        self
    }

    /// Connect on a port other than 43.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Use a different root server for referral discovery.
    pub fn with_iana_server<H: Into<String>>(mut self, host: H) -> Self {
        self.iana_server = host.into();
        self
    }

    /// Wait before the single retry of a rate-limited query.
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Pick the server for a domain: override, built-in table, IANA
    /// referral, then the default server.
    pub async fn resolve_server(&self, domain: &str) -> WhoisServer {
        if let Some(server) = &self.server_override {
            return server.clone();
        }

        let extension = extract_extension(domain);
        if let Some(server) = whois_server_for(&extension) {
            return server;
        }

        let tld = extension.rsplit('.').next().unwrap_or(&extension).to_string();
        match self.referral_for(&tld).await {
            Some(host) => WhoisServer::new(host, DEFAULT_TIMEOUT),
            None => default_server(),
        }
    }

    async fn referral_for(&self, tld: &str) -> Option<String> {
        if let Some(cached) = self.cached_referral(tld) {
            return cached;
        }

        let discovered = match self.query(&self.iana_server, tld, REFERRAL_TIMEOUT).await {
            Ok(response) => parse_iana_refer_response(&response),
            Err(e) => {
                debug!(tld = %tld, error = %e, "IANA referral query failed");
                None
            }
        };

        debug!(tld = %tld, server = ?discovered, "Discovered WHOIS server");
        if let Ok(mut referrals) = self.referrals.lock() {
            referrals.insert(tld.to_string(), discovered.clone());
        }
        discovered
    }

    fn cached_referral(&self, tld: &str) -> Option<Option<String>> {
        self.referrals
            .lock()
            .ok()
            .and_then(|referrals| referrals.get(tld).cloned())
    }

    /// Send one query line and read the whole answer.
    async fn query(&self, host: &str, query: &str, timeout: Duration) -> Result<String, SuggestError> {
        let port = self.port;
        let result = tokio::time::timeout(timeout, async {
            let mut stream = TcpStream::connect((host, port)).await?;
            stream.write_all(format!("{}\r\n", query).as_bytes()).await?;

            let mut response = Vec::new();
            stream.read_to_end(&mut response).await?;
            Ok::<_, std::io::Error>(response)
        })
        .await;

        match result {
            Ok(Ok(bytes)) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Ok(Err(e)) => Err(SuggestError::lookup(
                query,
                format!("WHOIS query to {} failed: {}", host, e),
            )),
            Err(_) => Err(SuggestError::timeout(
                format!("WHOIS query to {}", host),
                timeout,
            )),
        }
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<RegistrationStatus, SuggestError> {
        let server = self.resolve_server(domain).await;
        debug!(domain = %domain, server = %server.host, "Querying WHOIS");

        let mut response = self.query(&server.host, domain, server.timeout).await?;

        if is_rate_limited(&response) {
            warn!(domain = %domain, server = %server.host, "WHOIS rate limited, retrying once");
            tokio::time::sleep(self.rate_limit_delay).await;
            response = self.query(&server.host, domain, server.timeout).await?;

            if is_rate_limited(&response) {
                return Err(SuggestError::rate_limited(
                    server.host,
                    format!("still rate limited for {}", domain),
                ));
            }
        }

        Ok(classify_response(&response))
    }
}

/// Classify a WHOIS answer.
///
/// Available phrases win over registered ones; a response matching
/// neither set is inconclusive.
pub fn classify_response(response: &str) -> RegistrationStatus {
    let lower = response.to_lowercase();

    if AVAILABLE_PATTERNS.iter().any(|p| lower.contains(p)) {
        RegistrationStatus::Available
    } else if REGISTERED_PATTERNS.iter().any(|p| lower.contains(p)) {
        RegistrationStatus::Registered
    } else {
        RegistrationStatus::Inconclusive
    }
}

/// Check if the WHOIS output indicates rate limiting.
pub fn is_rate_limited(response: &str) -> bool {
    let lower = response.to_lowercase();
    RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Parse an IANA WHOIS response for the authoritative WHOIS server.
///
/// IANA uses either `refer:` or `whois:`; `refer:` wins when both appear.
///
/// ```text
/// whois:        whois.verisign-grs.com
/// refer:        whois.verisign-grs.com
/// ```
pub fn parse_iana_refer_response(response: &str) -> Option<String> {
    let mut whois_server = None;

    for line in response.lines() {
        let line = line.trim();
        if let Some(server) = line.strip_prefix("refer:") {
            let server = server.trim();
            if !server.is_empty() {
                return Some(server.to_string());
            }
        } else if let Some(server) = line.strip_prefix("whois:") {
            let server = server.trim();
            if !server.is_empty() {
                whois_server = Some(server.to_string());
            }
        }
    }

    whois_server
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    /// Local WHOIS server answering each query line through `reply`.
    async fn spawn_server<F>(reply: F) -> u16
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let reply = Arc::new(reply);

        tokio::spawn(async move {
            loop {
                let (socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let reply = reply.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(socket);
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.is_ok() {
                        let answer = (*reply)(line.trim_end());
                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(answer.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                });
            }
        });

        port
    }

    fn local_client(port: u16) -> WhoisClient {
        WhoisClient::new()
            .with_server(WhoisServer::new("127.0.0.1", Duration::from_secs(2)))
            .with_port(port)
            .with_rate_limit_delay(Duration::ZERO)
    }

    #[test]
    fn test_classify_response() {
        assert_eq!(
            classify_response("No match for \"BREWLY.COM\".\r\n>>> Last update"),
            RegistrationStatus::Available
        );
        assert_eq!(
            classify_response("Domain Status: free"),
            RegistrationStatus::Available
        );
        assert_eq!(
            classify_response("Domain Name: GOOGLE.COM\nRegistrar: MarkMonitor Inc.\nCreation Date: 1997-09-15"),
            RegistrationStatus::Registered
        );
        assert_eq!(
            classify_response("% Welcome to the registry\n"),
            RegistrationStatus::Inconclusive
        );
        assert!(RegistrationStatus::Inconclusive.is_available());
        assert!(!RegistrationStatus::Registered.is_available());
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limited("Rate limit exceeded. Try again later."));
        assert!(is_rate_limited("Too many requests from your IP."));
        assert!(!is_rate_limited("Normal whois response"));
    }

    #[test]
    fn test_parse_iana_refer_response() {
        let response = "% IANA WHOIS server\n\nrefer:        whois.verisign-grs.com\n\ndomain:       COM\n";
        assert_eq!(
            parse_iana_refer_response(response),
            Some("whois.verisign-grs.com".to_string())
        );

        let whois_field = "whois:        whois.nic.xyz\n\ndomain:       XYZ\n";
        assert_eq!(
            parse_iana_refer_response(whois_field),
            Some("whois.nic.xyz".to_string())
        );

        let both = "whois:        whois.old.example\nrefer:        whois.new.example\n";
        assert_eq!(
            parse_iana_refer_response(both),
            Some("whois.new.example".to_string())
        );

        assert_eq!(parse_iana_refer_response("refer:        \ndomain: COM\n"), None);
        assert_eq!(parse_iana_refer_response("% no referral\n"), None);
    }

    #[tokio::test]
    async fn test_resolve_server_from_table() {
        let client = WhoisClient::new();
        assert_eq!(
            client.resolve_server("brewly.net.ma").await.host,
            "whois.registre.ma"
        );
        assert_eq!(
            client.resolve_server("brewly.com").await.host,
            "whois.verisign-grs.com"
        );
    }

    #[tokio::test]
    async fn test_lookup_over_tcp() {
        let port = spawn_server(|query| {
            if query == "brewly.com" {
                "No match for \"BREWLY.COM\".\r\n".to_string()
            } else {
                "Domain Name: TAKEN.COM\r\nRegistrar: Example\r\n".to_string()
            }
        })
        .await;
        let client = local_client(port);

        assert_eq!(
            client.lookup("brewly.com").await.unwrap(),
            RegistrationStatus::Available
        );
        assert_eq!(
            client.lookup("taken.com").await.unwrap(),
            RegistrationStatus::Registered
        );
    }

    #[tokio::test]
    async fn test_rate_limited_query_is_retried_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let port = spawn_server(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                "Rate limit exceeded\r\n".to_string()
            } else {
                "NOT FOUND\r\n".to_string()
            }
        })
        .await;

        let status = local_client(port).lookup("brewly.com").await.unwrap();
        assert_eq!(status, RegistrationStatus::Available);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_is_an_error() {
        let port = spawn_server(|_| "Too many requests\r\n".to_string()).await;
        let err = local_client(port).lookup("brewly.com").await.unwrap_err();
        assert!(matches!(err, SuggestError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert!(local_client(port).lookup("brewly.com").await.is_err());
    }

    #[tokio::test]
    async fn test_referral_is_discovered_and_cached() {
        let iana_queries = Arc::new(AtomicUsize::new(0));
        let counter = iana_queries.clone();
        let port = spawn_server(move |query| {
            if query == "xyz" {
                counter.fetch_add(1, Ordering::SeqCst);
                "refer:        127.0.0.1\n".to_string()
            } else {
                format!("No match for {}\n", query)
            }
        })
        .await;

        let client = WhoisClient::new()
            .with_port(port)
            .with_iana_server("127.0.0.1")
            .with_rate_limit_delay(Duration::ZERO);

        assert_eq!(
            client.lookup("brewly.xyz").await.unwrap(),
            RegistrationStatus::Available
        );
        assert_eq!(
            client.lookup("beanhub.xyz").await.unwrap(),
            RegistrationStatus::Available
        );
        assert_eq!(iana_queries.load(Ordering::SeqCst), 1);
    }
}
