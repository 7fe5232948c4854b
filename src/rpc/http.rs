//! Minimal HTTP transport for JSON-RPC
//!
//! Sends one `POST` per request over a fresh TCP connection and reads the
//! response until the node closes it. Only plain `http://` endpoints are
//! supported, which covers local development nodes.

use crate::rpc::RpcError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// A parsed `http://host:port/path` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    /// Parse an endpoint URL (very basic)
    pub fn parse(url: &str) -> Result<Self, RpcError> {
        let invalid = |reason: &str| RpcError::InvalidUrl(format!("{} ({})", url, reason));

        if url.starts_with("https://") {
            return Err(invalid("https is not supported"));
        }
        let rest = url
            .strip_prefix("http://")
            .ok_or_else(|| invalid("expected http:// scheme"))?;

        let (authority, path) = match rest.find('/') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, "/"),
        };

        // IPv6 literals come bracketed: [::1]:8545
        let (host, port) = match authority.strip_prefix('[') {
            Some(bracketed) => {
                let (host, rest) = bracketed
                    .split_once(']')
                    .ok_or_else(|| invalid("unclosed IPv6 bracket"))?;
                match rest {
                    "" => (host, None),
                    _ => (
                        host,
                        Some(rest.strip_prefix(':').ok_or_else(|| invalid("bad port"))?),
                    ),
                }
            }
            None => match authority.rsplit_once(':') {
                Some((host, _)) if host.contains(':') => {
                    return Err(invalid("IPv6 hosts must be in brackets"))
                }
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            },
        };
        let port = match port {
            Some(port) => port.parse::<u16>().map_err(|_| invalid("bad port"))?,
            None => 80,
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// `host:port` form used in the `Host` header and error messages
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse a complete HTTP/1.x response
    pub fn parse(raw: &[u8]) -> Result<Self, RpcError> {
        let header_end = find(raw, b"\r\n\r\n")
            .ok_or_else(|| RpcError::Http("Invalid HTTP response".to_string()))?;
        let head = String::from_utf8_lossy(&raw[..header_end]);
        let rest = &raw[header_end + 4..];

        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or_else(|| RpcError::Http("Malformed status line".to_string()))?;

        let mut chunked = false;
        let mut content_length = None;
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
                    chunked = true;
                } else if name == "content-length" {
                    content_length = value.parse::<usize>().ok();
                }
            }
        }

        let body = if chunked {
            decode_chunked(rest)?
        } else if let Some(len) = content_length {
            rest.get(..len)
                .ok_or_else(|| RpcError::Http("Truncated HTTP body".to_string()))?
                .to_vec()
        } else {
            rest.to_vec()
        };

        Ok(Self { status, body })
    }
}

/// POST a JSON body and return the response
pub async fn post_json(
    endpoint: &Endpoint,
    body: &[u8],
    timeout: Duration,
) -> Result<HttpResponse, RpcError> {
    tokio::time::timeout(timeout, exchange(endpoint, body))
        .await
        .map_err(|_| RpcError::Timeout {
            waited: timeout,
            what: format!("HTTP response from {}", endpoint.authority()),
        })?
}

async fn exchange(endpoint: &Endpoint, body: &[u8]) -> Result<HttpResponse, RpcError> {
    let connection_error = |source: std::io::Error| RpcError::Connection {
        endpoint: endpoint.authority(),
        source,
    };

    // Connect
    let mut stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .map_err(connection_error)?;

    // Send request
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nAccept: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        endpoint.path,
        endpoint.authority(),
        body.len()
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(connection_error)?;
    stream.write_all(body).await.map_err(connection_error)?;

    // Read response
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(connection_error)?;

    HttpResponse::parse(&response)
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, RpcError> {
    let malformed = || RpcError::Http("Malformed chunked body".to_string());
    let mut body = Vec::new();

    loop {
        let line_end = find(data, b"\r\n").ok_or_else(malformed)?;
        let size_line = std::str::from_utf8(&data[..line_end]).map_err(|_| malformed())?;
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16).map_err(|_| malformed())?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(body);
        }

        let chunk = data.get(..size).ok_or_else(malformed)?;
        body.extend_from_slice(chunk);
        data = data.get(size + 2..).ok_or_else(malformed)?;
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
