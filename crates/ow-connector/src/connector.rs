//! Single-port connect-and-send
//!
//! Each attempt owns exactly one stream. The stream lives inside the future
//! raced against the deadline, so it is dropped (and the socket closed) on
//! every exit path: success, error, or the deadline firing first.
//!
//! A send is complete once the listener has read the stream and closed its
//! side. The listener sends nothing back; the attempt only waits for EOF.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use ow_core::config::ConnectionConfig;
use ow_core::traits::PortProbe;
use ow_core::{AttemptResult, ConnectionError, Port};
use ow_protocol::{compress, Payload, DEFAULT_COMPRESSION_LEVEL};

use crate::dialer::{Dialer, LoopbackDialer};

/// Deadlines and compression used by a [`PortConnector`]
#[derive(Debug, Clone)]
pub struct ConnectorOptions {
    /// Covers connect, compress, write, close and the listener's close
    pub connect_timeout: Duration,
    /// Covers the connect of a status check
    pub check_timeout: Duration,
    /// zlib level
    pub compression_level: u32,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(3000),
            check_timeout: Duration::from_millis(1000),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl From<&ConnectionConfig> for ConnectorOptions {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            check_timeout: config.check_timeout,
            compression_level: config.compression_level,
        }
    }
}

/// Connects to loopback ports and delivers compressed payloads
pub struct PortConnector<D: Dialer = LoopbackDialer> {
    dialer: D,
    options: ConnectorOptions,
}

impl PortConnector<LoopbackDialer> {
    /// Create a TCP connector
    pub fn new(options: ConnectorOptions) -> Self {
        Self::with_dialer(LoopbackDialer, options)
    }

    /// Create a TCP connector from configuration
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::new(ConnectorOptions::from(config))
    }
}

impl<D: Dialer> PortConnector<D> {
    /// Create a connector over a custom dialer
    pub fn with_dialer(dialer: D, options: ConnectorOptions) -> Self {
        Self { dialer, options }
    }

    /// Get the connector options
    pub fn options(&self) -> &ConnectorOptions {
        &self.options
    }

    /// Connect to `port`, send `payload` if present, and close
    ///
    /// Never retries and never returns an error: every failure resolves to
    /// `ConnectionFailed` or `Timeout`.
    pub async fn attempt_connect_and_send(
        &self,
        port: Port,
        payload: Option<&Payload>,
    ) -> AttemptResult {
        let deadline = self.options.connect_timeout;

        match tokio::time::timeout(deadline, self.connect_and_send(port, payload)).await {
            Ok(Ok(result)) => result,
            Ok(Err(error)) => {
                tracing::warn!("Failed to connect or send on port {}: {}", port, error);
                AttemptResult::ConnectionFailed { port, error }
            }
            Err(_) => {
                tracing::warn!("Connection to port {} timed out after {:?}", port, deadline);
                AttemptResult::Timeout { port }
            }
        }
    }

    async fn connect_and_send(
        &self,
        port: Port,
        payload: Option<&Payload>,
    ) -> Result<AttemptResult, ConnectionError> {
        let mut stream = self
            .dialer
            .dial(port)
            .await
            .map_err(|e| ConnectionError::from_connect(&e))?;
        tracing::info!("Successfully connected to Opiumware on port: {}", port);

        let Some(payload) = payload else {
            // Probe only; the connection already proved the listener exists
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Close after probe on port {} failed: {}", port, e);
            }
            return Ok(AttemptResult::Connected { port });
        };

        let compressed = compress(payload.as_bytes(), self.options.compression_level)?;

        stream
            .write_all(&compressed)
            .await
            .map_err(|e| ConnectionError::from_write(&e))?;
        stream
            .shutdown()
            .await
            .map_err(|e| ConnectionError::from_write(&e))?;

        let discarded = drain_until_closed(&mut stream)
            .await
            .map_err(|e| ConnectionError::from_drain(&e))?;
        if discarded > 0 {
            tracing::debug!("Listener on port {} replied {} bytes", port, discarded);
        }

        tracing::info!("Script sent to port {} ({} bytes)", port, compressed.len());
        Ok(AttemptResult::ConnectedAndSent {
            port,
            bytes: compressed.len(),
        })
    }

    /// Whether anything accepts connections on `port`
    ///
    /// Connects within the check deadline and closes immediately without
    /// writing.
    pub async fn check_port_open(&self, port: Port) -> bool {
        match tokio::time::timeout(self.options.check_timeout, self.dialer.dial(port)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                true
            }
            Ok(Err(e)) => {
                tracing::debug!("Port {} is not available: {}", port, e);
                false
            }
            Err(_) => {
                tracing::debug!("Status check on port {} timed out", port);
                false
            }
        }
    }
}

/// Read until the peer closes, returning how many bytes were skipped
async fn drain_until_closed<S: AsyncRead + Unpin>(stream: &mut S) -> std::io::Result<usize> {
    let mut buf = [0u8; 256];
    let mut total = 0;
    loop {
        match stream.read(&mut buf).await? {
            0 => return Ok(total),
            n => total += n,
        }
    }
}

#[async_trait]
impl<D: Dialer> PortProbe for PortConnector<D> {
    async fn attempt(&self, port: Port, payload: Option<&Payload>) -> AttemptResult {
        self.attempt_connect_and_send(port, payload).await
    }

    async fn check_open(&self, port: Port) -> bool {
        self.check_port_open(port).await
    }
}
