/// HTTP status codes the file server emits.
///
/// - `Ok` (200): File or listing served
/// - `Forbidden` (403): Path escapes the served root
/// - `NotFound` (404): Nothing at that path, or the directory vanished
/// - `MethodNotAllowed` (405): Anything but GET
/// - `UnsupportedMediaType` (415): File type outside the MIME table
/// - `InternalServerError` (500): Unexpected fault while handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 415 Unsupported Media Type
    UnsupportedMediaType,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::UnsupportedMediaType.reason_phrase(), "Unsupported Media Type");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep insertion order; that is the order they go on the wire.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers in insertion order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Nothing is added implicitly: a header only appears if it was set here.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content("text/html", b"<p>hi</p>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header, or replaces the value of one with the same name while
    /// keeping its original position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the body together with its `Content-Type` and `Content-Length`.
    pub fn content(self, content_type: &str, body: Vec<u8>) -> Self {
        let len = body.len();
        self.header("Content-Type", content_type)
            .header("Content-Length", len.to_string())
            .body(body)
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A 200 OK carrying `body` as `content_type`.
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content(content_type, body)
            .build()
    }

    /// A short plain-text error such as `403 Access denied`.
    pub fn text(status: StatusCode, message: &str) -> Self {
        ResponseBuilder::new(status)
            .content("text/plain", message.as_bytes().to_vec())
            .build()
    }

    /// A status line with no headers and no body.
    pub fn bare(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    pub fn forbidden() -> Self {
        Self::text(StatusCode::Forbidden, "Access denied")
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NotFound, "File not found")
    }

    pub fn directory_not_found() -> Self {
        Self::text(StatusCode::NotFound, "Directory not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::bare(StatusCode::MethodNotAllowed)
    }

    pub fn unsupported_media_type() -> Self {
        Self::bare(StatusCode::UnsupportedMediaType)
    }

    pub fn internal_error() -> Self {
        Self::bare(StatusCode::InternalServerError)
    }

    /// Looks up a header by exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
