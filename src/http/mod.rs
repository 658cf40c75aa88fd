//! HTTP/1.1 wire handling over raw TCP streams.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine (read one chunk, dispatch, write, close)
//! - **`parser`**: Request parsing, plus response parsing for the client side
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Every connection carries exactly one request; there is no keep-alive.
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One fixed-size read
//!        └──────┬──────┘
//!               │ Request parsed (malformed → Closed, no response)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatcher builds the response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub use parser::{parse_request, parse_response, ParseError, ParsedResponse, ResponseParseError};
pub use request::{Method, Request};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use writer::serialize_response;
