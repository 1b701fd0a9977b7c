//! Connection probe
//!
//! Opens a TLS connection to a target, sends a single `HEAD` request and
//! reports the negotiated session together with the presented certificate
//! chain. In insecure mode the chain is not validated, which lets callers
//! inspect self-signed, expired or otherwise untrusted chains.

use crate::checks::dns;
use crate::checks::verifier::{mozilla_roots, InsecureVerifier};
use crate::utils::ProbeError;
use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::debug;
use url::{Host, Url};

const USER_AGENT: &str = concat!("checkssl/", env!("CARGO_PKG_VERSION"));
const MAX_HEADERS: usize = 256;
const MAX_HEAD_BYTES: usize = 64 * 1024;
/// Every header line takes at least `a:\r\n`
const MAX_HEADERS_LIMIT: usize = MAX_HEAD_BYTES / 4;

/// Where a probe connects to, derived from an `https://` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: Url,
    /// Host without IPv6 brackets, used for resolution and SNI
    pub host: String,
    /// Whether `host` is a DNS name rather than an address literal
    pub is_domain: bool,
    pub port: u16,
    /// `Host` header value
    pub authority: String,
    /// Request target, path plus query
    pub path: String,
}

impl Endpoint {
    pub fn parse(target: &str) -> Result<Self, ProbeError> {
        let url = Url::parse(target).map_err(|e| match e {
            url::ParseError::EmptyHost => ProbeError::MissingHost,
            other => ProbeError::InvalidTarget {
                target: target.to_string(),
                message: other.to_string(),
            },
        })?;

        let (host, is_domain) = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => (domain.to_string(), true),
            Some(Host::Ipv4(ip)) => (ip.to_string(), false),
            Some(Host::Ipv6(ip)) => (ip.to_string(), false),
            _ => return Err(ProbeError::MissingHost),
        };

        let port = url.port_or_known_default().unwrap_or(443);
        let host_str = url.host_str().unwrap_or(&host).to_string();
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host_str, port),
            None => host_str,
        };

        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            url,
            host,
            is_domain,
            port,
            authority,
            path,
        })
    }
}

/// Headers of interest from the `HEAD` response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResponse {
    /// `Server` header, empty if absent
    pub server: String,
    /// `X-Powered-By` header, empty if absent
    pub powered_by: String,
    /// Protocol of the response, e.g. `http/1.1`
    pub version: String,
}

/// What a successful probe observed
#[derive(Debug, Clone, Default)]
pub struct ProbeSession {
    pub response: HeadResponse,
    /// Peer address of the established connection
    pub peer_ip: Option<IpAddr>,
    /// Negotiated application protocol, falling back to the response protocol
    pub http_version: String,
    pub tls_version: u16,
    pub cipher_suite: u16,
    /// Server name sent in SNI, empty for address literals
    pub server_name: String,
    /// Presented chain, DER encoded, leaf first
    pub chain: Vec<Vec<u8>>,
}

/// Single-request TLS probe with a per-phase timeout
#[derive(Debug, Clone)]
pub struct Probe {
    timeout_secs: u64,
}

impl Probe {
    /// A timeout of zero disables the deadline
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    async fn bounded<F: Future>(
        &self,
        phase: &'static str,
        fut: F,
    ) -> Result<F::Output, ProbeError> {
        match self.timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| ProbeError::Timeout {
                    phase,
                    seconds: self.timeout_secs,
                }),
            None => Ok(fut.await),
        }
    }

    /// Probe an `https://` URL
    pub async fn run(&self, target: &str, insecure: bool) -> Result<ProbeSession, ProbeError> {
        let endpoint = Endpoint::parse(target)?;
        let (stream, peer_ip) = self.connect(&endpoint).await?;

        let connector = TlsConnector::from(Arc::new(client_config(insecure)?));
        let server_name = ServerName::try_from(endpoint.host.clone()).map_err(|_| {
            ProbeError::Configuration {
                message: format!("invalid server name: {}", endpoint.host),
            }
        })?;

        let tls = self
            .bounded("tls handshake", connector.connect(server_name, stream))
            .await?
            .map_err(handshake_error)?;

        let (_, connection) = tls.get_ref();
        let tls_version = connection.protocol_version().map(u16::from).unwrap_or(0);
        let cipher_suite = connection
            .negotiated_cipher_suite()
            .map(|cs| u16::from(cs.suite()))
            .unwrap_or(0);
        let alpn = connection
            .alpn_protocol()
            .map(|p| String::from_utf8_lossy(p).into_owned());
        let chain: Vec<Vec<u8>> = connection
            .peer_certificates()
            .map(|certs| certs.iter().map(|c| c.as_ref().to_vec()).collect())
            .unwrap_or_default();

        debug!(
            "negotiated {:#06x} / {:#06x} with {} (alpn {:?}, {} certificates, insecure={})",
            tls_version,
            cipher_suite,
            peer_ip,
            alpn,
            chain.len(),
            insecure
        );

        let response = if alpn.as_deref() == Some("h2") {
            self.bounded("http/2 request", head_h2(tls, &endpoint))
                .await??
        } else {
            self.bounded("http/1.1 request", head_http1(tls, &endpoint))
                .await??
        };

        let http_version = alpn
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| response.version.clone());

        Ok(ProbeSession {
            response,
            peer_ip: Some(peer_ip),
            http_version,
            tls_version,
            cipher_suite,
            server_name: if endpoint.is_domain {
                endpoint.host.clone()
            } else {
                String::new()
            },
            chain,
        })
    }

    /// Resolve and connect, trying each address in turn.
    ///
    /// One deadline covers all addresses together.
    async fn connect(&self, endpoint: &Endpoint) -> Result<(TcpStream, IpAddr), ProbeError> {
        let addresses = self
            .bounded("dns lookup", dns::resolve_host(&endpoint.host))
            .await??;

        self.connect_addresses(addresses, endpoint).await
    }

    async fn connect_addresses(
        &self,
        addresses: Vec<IpAddr>,
        endpoint: &Endpoint,
    ) -> Result<(TcpStream, IpAddr), ProbeError> {
        self.bounded("connect", connect_any(addresses, endpoint)).await?
    }
}

async fn connect_any(
    addresses: Vec<IpAddr>,
    endpoint: &Endpoint,
) -> Result<(TcpStream, IpAddr), ProbeError> {
    let mut last_error = None;
    for ip in addresses {
        let addr = SocketAddr::new(ip, endpoint.port);
        debug!("connecting to {}", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                let peer = stream.peer_addr().map(|a| a.ip()).unwrap_or(ip);
                debug!("connected to {}", peer);
                return Ok((stream, peer));
            }
            Err(e) => {
                debug!("connection to {} failed: {}", addr, e);
                last_error = Some(connect_error(e, ip, endpoint));
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ProbeError::Dns {
        host: endpoint.host.clone(),
        message: "no such host".to_string(),
    }))
}

fn client_config(insecure: bool) -> Result<ClientConfig, ProbeError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(|e| ProbeError::Configuration {
            message: e.to_string(),
        })?;

    let mut config = if insecure {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(InsecureVerifier::new(provider)))
            .with_no_client_auth()
    } else {
        builder
            .with_root_certificates(mozilla_roots())
            .with_no_client_auth()
    };
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(config)
}

fn connect_error(err: io::Error, ip: IpAddr, endpoint: &Endpoint) -> ProbeError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused {
            ip,
            port: endpoint.port,
        },
        _ => ProbeError::Connection {
            host: endpoint.host.clone(),
            port: endpoint.port,
            message: err.to_string(),
        },
    }
}

/// Separate chain-validation failures from other handshake failures
pub(crate) fn handshake_error(err: io::Error) -> ProbeError {
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        Some(tls_err @ rustls::Error::InvalidCertificate(_)) => ProbeError::Certificate {
            message: tls_err.to_string(),
        },
        Some(tls_err) => ProbeError::Handshake {
            message: tls_err.to_string(),
        },
        None => ProbeError::Handshake {
            message: err.to_string(),
        },
    }
}

fn http_error(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::Http {
        message: err.to_string(),
    }
}

async fn head_h2(
    stream: TlsStream<TcpStream>,
    endpoint: &Endpoint,
) -> Result<HeadResponse, ProbeError> {
    let (client, connection) = h2::client::handshake(stream).await.map_err(http_error)?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            debug!("http/2 connection closed: {}", e);
        }
    });

    let mut client = client.ready().await.map_err(http_error)?;
    let request = http::Request::builder()
        .method(http::Method::HEAD)
        .uri(endpoint.url.as_str())
        .header(http::header::USER_AGENT, USER_AGENT)
        .body(())
        .map_err(http_error)?;

    let (response, _) = client.send_request(request, true).map_err(http_error)?;
    let response = response.await.map_err(http_error)?;
    let header = |name: http::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    Ok(HeadResponse {
        server: header(http::header::SERVER),
        powered_by: header(http::header::HeaderName::from_static("x-powered-by")),
        version: "h2".to_string(),
    })
}

async fn head_http1(
    mut stream: TlsStream<TcpStream>,
    endpoint: &Endpoint,
) -> Result<HeadResponse, ProbeError> {
    let request = format!(
        "HEAD {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\n\
         Accept: */*\r\nConnection: close\r\n\r\n",
        endpoint.path, endpoint.authority, USER_AGENT
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(http_error)?;

    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.map_err(http_error)?;
        if n == 0 {
            return Err(ProbeError::Http {
                message: "connection closed before response headers".to_string(),
            });
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(response) = parse_http1_head(&buf)? {
            return Ok(response);
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Err(ProbeError::Http {
                message: "response headers too large".to_string(),
            });
        }
    }
}

/// Parse a buffered HTTP/1.x response head; `None` until it is complete.
///
/// The header table grows until the head no longer fits
/// [`MAX_HEAD_BYTES`], so only the byte limit caps the header count.
pub(crate) fn parse_http1_head(buf: &[u8]) -> Result<Option<HeadResponse>, ProbeError> {
    let mut capacity = MAX_HEADERS;
    loop {
        let mut headers = vec![httparse::EMPTY_HEADER; capacity];
        let mut response = httparse::Response::new(&mut headers);

        match response.parse(buf) {
            Ok(httparse::Status::Complete(_)) => {
                let header = |name: &str| {
                    response
                        .headers
                        .iter()
                        .find(|h| h.name.eq_ignore_ascii_case(name))
                        .map(|h| String::from_utf8_lossy(h.value).trim().to_string())
                        .unwrap_or_default()
                };
                let version = match response.version {
                    Some(0) => "http/1.0",
                    _ => "http/1.1",
                };
                return Ok(Some(HeadResponse {
                    server: header("server"),
                    powered_by: header("x-powered-by"),
                    version: version.to_string(),
                }));
            }
            Ok(httparse::Status::Partial) => return Ok(None),
            Err(httparse::Error::TooManyHeaders) if capacity < MAX_HEADERS_LIMIT => {
                capacity = (capacity * 2).min(MAX_HEADERS_LIMIT);
            }
            Err(e) => {
                return Err(ProbeError::Http {
                    message: format!("malformed response: {}", e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults() {
        let endpoint = Endpoint::parse("https://example.com").unwrap();
        assert_eq!(endpoint.host, "example.com");
        assert!(endpoint.is_domain);
        assert_eq!(endpoint.port, 443);
        assert_eq!(endpoint.authority, "example.com");
        assert_eq!(endpoint.path, "/");
    }

    #[test]
    fn test_endpoint_with_port_and_query() {
        let endpoint = Endpoint::parse("https://example.com:8443/health?full=1").unwrap();
        assert_eq!(endpoint.port, 8443);
        assert_eq!(endpoint.authority, "example.com:8443");
        assert_eq!(endpoint.path, "/health?full=1");
    }

    #[test]
    fn test_endpoint_ipv6_literal() {
        let endpoint = Endpoint::parse("https://[::1]:8443").unwrap();
        assert_eq!(endpoint.host, "::1");
        assert!(!endpoint.is_domain);
        assert_eq!(endpoint.authority, "[::1]:8443");
    }

    #[test]
    fn test_endpoint_without_host() {
        assert!(matches!(
            Endpoint::parse("https://"),
            Err(ProbeError::MissingHost)
        ));
    }

    #[test]
    fn test_endpoint_garbage() {
        assert!(matches!(
            Endpoint::parse("https://exa mple.com"),
            Err(ProbeError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_parse_http1_head() {
        let raw = b"HTTP/1.1 200 OK\r\nServer: ATS/9.1\r\n\
            X-Powered-By: PHP/8.2\r\nContent-Length: 0\r\n\r\n";
        let response = parse_http1_head(raw).unwrap().unwrap();
        assert_eq!(response.server, "ATS/9.1");
        assert_eq!(response.powered_by, "PHP/8.2");
        assert_eq!(response.version, "http/1.1");
    }

    #[test]
    fn test_parse_http1_head_partial() {
        let raw = b"HTTP/1.0 301 Moved\r\nServer: gws\r\n";
        assert_eq!(parse_http1_head(raw).unwrap(), None);

        let raw = b"HTTP/1.0 301 Moved\r\nServer: gws\r\n\r\n";
        let response = parse_http1_head(raw).unwrap().unwrap();
        assert_eq!(response.server, "gws");
        assert_eq!(response.powered_by, "");
        assert_eq!(response.version, "http/1.0");
    }

    #[test]
    fn test_parse_http1_head_many_headers() {
        let mut raw = String::from("HTTP/1.1 200 OK\r\n");
        for i in 0..600 {
            raw.push_str(&format!("X-Header-{}: {}\r\n", i, i));
        }
        raw.push_str("Server: nginx\r\n\r\n");

        let response = parse_http1_head(raw.as_bytes()).unwrap().unwrap();
        assert_eq!(response.server, "nginx");
    }

    #[test]
    fn test_parse_http1_head_malformed() {
        assert!(parse_http1_head(b"SSH-2.0-OpenSSH_9.6\r\n\r\n").is_err());
    }

    #[test]
    fn test_certificate_error_is_unwrapped() {
        let err = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(rustls::CertificateError::UnknownIssuer),
        );
        match handshake_error(err) {
            ProbeError::Certificate { message } => assert!(message.contains("UnknownIssuer")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_other_handshake_errors() {
        let err = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::HandshakeNotComplete,
        );
        assert!(matches!(handshake_error(err), ProbeError::Handshake { .. }));

        let err = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(matches!(handshake_error(err), ProbeError::Handshake { .. }));
    }

    #[tokio::test]
    async fn test_connect_deadline_covers_all_addresses() {
        // TEST-NET-1 addresses either drop SYNs or fail fast
        let endpoint = Endpoint::parse("https://192.0.2.1").unwrap();
        let addresses: Vec<IpAddr> = ["192.0.2.1", "192.0.2.2", "192.0.2.3"]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();

        let started = std::time::Instant::now();
        let result = Probe::new(1).connect_addresses(addresses, &endpoint).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_millis(2500));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        assert_eq!(Probe::new(0).timeout(), None);
        assert_eq!(Probe::new(15).timeout(), Some(Duration::from_secs(15)));
    }
}
