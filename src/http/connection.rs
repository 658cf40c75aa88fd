use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::server::dispatcher::Dispatcher;

pub struct Connection<S = TcpStream> {
    stream: S,
    dispatcher: Arc<Dispatcher>,
    read_buffer_size: usize,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, dispatcher: Arc<Dispatcher>, read_buffer_size: usize) -> Self {
        Self {
            stream,
            dispatcher,
            read_buffer_size,
            state: ConnectionState::Reading,
        }
    }

    /// Serves exactly one request, then shuts the stream down.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        // Best effort; the peer may already be gone.
        let _ = self.stream.shutdown().await;

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    if let Some(req) = self.read_request().await? {
                        self.state = ConnectionState::Processing(req);
                    }
                }

                ConnectionState::Processing(req) => {
                    let response = self.dispatcher.dispatch(&req).await;
                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Handled request"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads one chunk and parses it. `None` means there is nothing to answer:
    /// the peer closed without sending, or the request line was malformed.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let mut buffer = vec![0u8; self.read_buffer_size];
        let n = self.stream.read(&mut buffer).await?;

        if n == 0 {
            tracing::debug!("Peer closed before sending a request");
            return Ok(None);
        }

        match parse_request(&buffer[..n]) {
            Ok(req) => Ok(Some(req)),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed request");
                Ok(None)
            }
        }
    }
}
