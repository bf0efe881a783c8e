//! HTTP/1.1 fetcher over raw sockets
//!
//! This module talks to web servers directly:
//! - Opening TCP connections (TLS via rustls for `https`)
//! - Writing a minimal `GET` request with `Connection: close`
//! - Parsing the status line and headers itself
//! - Reading the body only for `200` HTML responses
//! - Following a bounded number of redirects
//!
//! Every failure is reported as a [`FetchError`], which maps onto the
//! [`SkipReason`] the crawler records for the page.

use crate::config::{Config, CrawlerConfig};
use crate::state::SkipReason;
use crate::url::has_web_scheme;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

/// Redirects followed for one fetch unless configured otherwise
pub const DEFAULT_MAX_REDIRECTS: u32 = 3;

/// A byte stream the fetcher can speak HTTP over (plain TCP or TLS)
pub trait Connection: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Connection for T {}

/// Why a fetch produced no page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unsupported scheme: {0}")]
    InvalidScheme(String),

    #[error("{url} is not HTML (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("{url} returned status {status}")]
    StatusRejected { url: String, status: u16 },

    #[error("Redirect budget exhausted at {0}")]
    RedirectExhausted(String),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Timed out fetching {0}")]
    Timeout(String),

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("TLS setup failed: {0}")]
    TlsSetup(String),
}

impl FetchError {
    /// The skip reason recorded for a page that failed this way
    pub fn skip_reason(&self) -> SkipReason {
        match self {
            FetchError::InvalidScheme(_) => SkipReason::InvalidScheme,
            FetchError::NotHtml { .. } => SkipReason::NotHtml,
            FetchError::StatusRejected { .. } => SkipReason::StatusRejected,
            FetchError::RedirectExhausted(_) => SkipReason::RedirectExhausted,
            FetchError::Network { .. } | FetchError::TlsSetup(_) => SkipReason::NetworkError,
            FetchError::Timeout(_) => SkipReason::Timeout,
            FetchError::MalformedResponse { .. } => SkipReason::MalformedResponse,
        }
    }

    fn network(url: &Url, err: impl fmt::Display) -> Self {
        FetchError::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    fn malformed(url: &Url, message: impl Into<String>) -> Self {
        FetchError::MalformedResponse {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// An HTML page returned by a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: Url,
    /// Where the redirect chain ended
    pub final_url: Url,
    pub status: u16,
    pub body: String,
}

/// Status line and headers of one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    /// Lower-cased header names, values in arrival order
    pub headers: HashMap<String, Vec<String>>,
}

impl ResponseHead {
    /// First value of a header
    pub fn first(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> &str {
        self.first("content-type").unwrap_or("")
    }

    pub fn is_html(&self) -> bool {
        self.content_type().to_ascii_lowercase().starts_with("text/html")
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Location header of a 3xx response
    pub fn location(&self) -> Option<&str> {
        if self.is_redirect() {
            self.first("location")
        } else {
            None
        }
    }

    fn is_chunked(&self) -> bool {
        self.headers.get("transfer-encoding").is_some_and(|values| {
            values
                .iter()
                .any(|v| v.to_ascii_lowercase().contains("chunked"))
        })
    }

    fn content_length(&self) -> Option<u64> {
        self.first("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok())
    }
}

/// Extracts the status code from an HTTP status line
pub fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Builds the request text for one URL
pub fn build_request(url: &Url, user_agent: &str) -> String {
    let mut target = url.path().to_string();
    if target.is_empty() {
        target.push('/');
    }
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host.push_str(&format!(":{}", port));
    }

    format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nUser-Agent: {}\r\nConnection: close\r\n\r\n",
        target, host, user_agent
    )
}

async fn read_text_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&raw);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Reads the status line and headers, stopping at the first empty line
///
/// Returns `Ok(None)` when the status line is missing or unparseable.
pub async fn read_head<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<Option<ResponseHead>> {
    let status = match read_text_line(reader).await? {
        Some(line) => match parse_status_line(&line) {
            Some(status) => status,
            None => return Ok(None),
        },
        None => return Ok(None),
    };

    let mut head = ResponseHead {
        status,
        headers: HashMap::new(),
    };

    while let Some(line) = read_text_line(reader).await? {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            head.headers
                .entry(name.trim().to_ascii_lowercase())
                .or_default()
                .push(value.trim().to_string());
        }
    }

    Ok(Some(head))
}

fn body_too_large(limit: usize) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("body exceeds {} bytes", limit),
    )
}

/// Decodes a chunked transfer-encoded body of at most `max_bytes`
///
/// A chunk is rejected as soon as its declared size would take the body over
/// the limit, before any of it is read.
pub async fn read_chunked<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_bytes: usize,
) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let Some(line) = read_text_line(reader).await? else {
            break;
        };
        let size_field = line.split(';').next().unwrap_or("").trim();
        let size = u64::from_str_radix(size_field, 16).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("bad chunk size '{}'", size_field),
            )
        })?;

        if size == 0 {
            // trailers
            while let Some(trailer) = read_text_line(reader).await? {
                if trailer.is_empty() {
                    break;
                }
            }
            break;
        }

        let within_limit = (body.len() as u64)
            .checked_add(size)
            .is_some_and(|total| total <= max_bytes as u64);
        if !within_limit {
            return Err(body_too_large(max_bytes));
        }

        let read = (&mut *reader).take(size).read_to_end(&mut body).await?;
        if (read as u64) < size {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "chunk ended early",
            ));
        }
        read_text_line(reader).await?;
    }
    Ok(body)
}

/// Reads the body a head announces: chunked, by length, or until EOF
///
/// Bodies over `max_bytes` fail with [`std::io::ErrorKind::InvalidData`].
pub async fn read_body<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    head: &ResponseHead,
    max_bytes: usize,
) -> std::io::Result<Vec<u8>> {
    if head.is_chunked() {
        return read_chunked(reader, max_bytes).await;
    }

    let mut body = Vec::new();
    match head.content_length() {
        Some(length) if length > max_bytes as u64 => return Err(body_too_large(max_bytes)),
        Some(length) => {
            (&mut *reader).take(length).read_to_end(&mut body).await?;
        }
        None => {
            let cap = (max_bytes as u64).saturating_add(1);
            (&mut *reader).take(cap).read_to_end(&mut body).await?;
            if body.len() > max_bytes {
                return Err(body_too_large(max_bytes));
            }
        }
    }
    Ok(body)
}

/// Decodes body bytes lossily and normalizes line endings to `\n`
pub fn join_lines(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Raw-socket HTTP/1.1 client
///
/// Cheap to clone; clones share the TLS configuration.
#[derive(Clone)]
pub struct WireFetcher {
    user_agent: String,
    connect_timeout: Duration,
    read_timeout: Duration,
    max_body_bytes: usize,
    tls: TlsConnector,
}

impl fmt::Debug for WireFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireFetcher")
            .field("user_agent", &self.user_agent)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl WireFetcher {
    /// Creates a fetcher that identifies itself with `user_agent`
    pub fn new(user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let defaults = CrawlerConfig::default();
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let roots = RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| FetchError::TlsSetup(e.to_string()))?
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            user_agent: user_agent.into(),
            connect_timeout: Duration::from_millis(defaults.connect_timeout_ms),
            read_timeout: Duration::from_millis(defaults.read_timeout_ms),
            max_body_bytes: defaults.max_body_bytes,
            tls: TlsConnector::from(Arc::new(config)),
        })
    }

    /// Creates a fetcher from the user agent, timeout and body-size settings
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(config.user_agent.header_value())?
            .with_timeouts(
                Duration::from_millis(config.crawler.connect_timeout_ms),
                Duration::from_millis(config.crawler.read_timeout_ms),
            )
            .with_max_body_bytes(config.crawler.max_body_bytes))
    }

    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches an HTML page, following at most `max_redirects` redirects
    ///
    /// Only a `200` response with a `text/html` content type yields a page.
    /// The returned page is keyed by `url`, not by where the chain ended.
    pub async fn fetch(&self, url: &Url, max_redirects: u32) -> Result<FetchedPage, FetchError> {
        let mut current = url.clone();
        let mut remaining = max_redirects;

        loop {
            if !has_web_scheme(&current) {
                return Err(FetchError::InvalidScheme(current.to_string()));
            }

            let (head, body) = self.exchange(&current).await?;

            if head.status == 200 {
                return match body {
                    Some(body) => {
                        tracing::debug!("Fetched {} ({} bytes)", current, body.len());
                        Ok(FetchedPage {
                            url: url.clone(),
                            final_url: current,
                            status: head.status,
                            body,
                        })
                    }
                    None => Err(FetchError::NotHtml {
                        url: current.to_string(),
                        content_type: head.content_type().to_string(),
                    }),
                };
            }

            match head.location() {
                Some(location) if remaining > 0 => {
                    let next = current.join(location).map_err(|e| {
                        FetchError::malformed(&current, format!("bad location '{}': {}", location, e))
                    })?;
                    tracing::debug!("Redirect {} -> {} ({} left)", current, next, remaining - 1);
                    current = next;
                    remaining -= 1;
                }
                Some(_) => return Err(FetchError::RedirectExhausted(current.to_string())),
                None => {
                    return Err(FetchError::StatusRejected {
                        url: current.to_string(),
                        status: head.status,
                    })
                }
            }
        }
    }

    /// One request/response on a fresh connection
    ///
    /// The body is read only for `200` HTML responses.
    async fn exchange(&self, url: &Url) -> Result<(ResponseHead, Option<String>), FetchError> {
        let stream = bounded(self.connect_timeout, url, self.connect(url)).await?;
        let request = build_request(url, &self.user_agent);

        bounded(self.read_timeout, url, async {
            let mut reader = BufReader::new(stream);
            reader
                .get_mut()
                .write_all(request.as_bytes())
                .await
                .map_err(|e| FetchError::network(url, e))?;
            reader
                .get_mut()
                .flush()
                .await
                .map_err(|e| FetchError::network(url, e))?;

            let head = read_head(&mut reader)
                .await
                .map_err(|e| FetchError::network(url, e))?
                .ok_or_else(|| FetchError::malformed(url, "missing or invalid status line"))?;

            if head.status != 200 || !head.is_html() {
                return Ok((head, None));
            }

            let bytes = read_body(&mut reader, &head, self.max_body_bytes)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::InvalidData => FetchError::malformed(url, e.to_string()),
                    _ => FetchError::network(url, e),
                })?;
            Ok((head, Some(join_lines(&bytes))))
        })
        .await
    }

    async fn connect(&self, url: &Url) -> Result<Box<dyn Connection>, FetchError> {
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(FetchError::malformed(url, "URL has no host")),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| FetchError::InvalidScheme(url.to_string()))?;

        let tcp = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| FetchError::network(url, e))?;

        if url.scheme().eq_ignore_ascii_case("https") {
            let server_name =
                ServerName::try_from(host).map_err(|e| FetchError::network(url, e))?;
            let tls = self
                .tls
                .connect(server_name, tcp)
                .await
                .map_err(|e| FetchError::network(url, e))?;
            Ok(Box::new(tls))
        } else {
            Ok(Box::new(tcp))
        }
    }
}

async fn bounded<T, F>(limit: Duration, url: &Url, work: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .map_err(|_| FetchError::Timeout(url.to_string()))?
}
