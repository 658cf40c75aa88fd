//! Accepting connections and answering requests.
//!
//! - **`listener`**: Owns the listening socket and applies the per-connection [`Strategy`](crate::config::Strategy)
//! - **`dispatcher`**: Maps a parsed request onto the filesystem and picks the status

pub mod dispatcher;
pub mod listener;

pub use dispatcher::Dispatcher;
pub use listener::Server;
