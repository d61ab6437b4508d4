//! Outbound connection establishment

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use ow_core::Port;

/// Opens the byte stream an attempt writes into
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Stream handed back on a successful dial
    ///
    /// Written to by the attempt, then read until the listener closes.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connect to `port`; no deadline is applied here
    async fn dial(&self, port: Port) -> io::Result<Self::Stream>;
}

/// Dials `127.0.0.1:<port>` over TCP
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackDialer;

impl LoopbackDialer {
    /// Socket address for a loopback port
    pub fn address(port: Port) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, port.get()))
    }
}

#[async_trait]
impl Dialer for LoopbackDialer {
    type Stream = TcpStream;

    async fn dial(&self, port: Port) -> io::Result<TcpStream> {
        let addr = Self::address(port);
        tracing::debug!("Connecting to {}", addr);
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
