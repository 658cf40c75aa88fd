//! docroot - a small HTTP/1.1 file server on raw TCP.
//!
//! Serves files and generated directory listings from one root directory,
//! either one connection at a time or one task per connection.

pub mod client;
pub mod config;
pub mod files;
pub mod http;
pub mod server;
