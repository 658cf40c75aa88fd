use std::collections::HashMap;

use thiserror::Error;

use crate::http::request::{Method, Request};

const HEADERS_END: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty request")]
    Empty,
    #[error("malformed request line: {0:?}")]
    InvalidRequestLine(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseParseError {
    #[error("no header/body separator in response")]
    MissingSeparator,
    #[error("malformed status line: {0:?}")]
    InvalidStatusLine(String),
    #[error("status code is not a number: {0:?}")]
    InvalidStatusCode(String),
}

/// A response as seen by the client side of the wire.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ParsedResponse {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }
}

/// Parses the first chunk read from a connection into a [`Request`].
///
/// The request line must carry at least `METHOD PATH VERSION`. Header lines
/// are read until the first empty line and split on the first colon; lines
/// without a colon are skipped. Anything after the blank line is ignored,
/// since only bodiless GETs are served.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = String::from_utf8_lossy(buf);
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut lines = text.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();

    let (Some(method), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    };

    // Headers
    let mut headers = HashMap::new();
    for line in lines.take_while(|line| !line.is_empty()) {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
    })
}

/// Splits a complete response (read until the peer closed) into status code,
/// headers and body.
pub fn parse_response(buf: &[u8]) -> Result<ParsedResponse, ResponseParseError> {
    let headers_end = find_headers_end(buf).ok_or(ResponseParseError::MissingSeparator)?;
    let head = String::from_utf8_lossy(&buf[..headers_end]);
    let body = buf[headers_end + HEADERS_END.len()..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();

    let mut tokens = status_line.splitn(3, ' ');
    let _version = tokens.next();
    let code = tokens
        .next()
        .ok_or_else(|| ResponseParseError::InvalidStatusLine(status_line.to_string()))?;
    let status = code
        .parse::<u16>()
        .map_err(|_| ResponseParseError::InvalidStatusCode(code.to_string()))?;

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok(ParsedResponse {
        status,
        headers,
        body,
    })
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADERS_END.len()).position(|w| w == HEADERS_END)
}
