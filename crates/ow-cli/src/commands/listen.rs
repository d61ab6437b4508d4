//! Loopback receiver
//!
//! Stands in for the Opiumware listener: accepts connections, reads each
//! stream until the sender closes, inflates it and prints the command.

use anyhow::{Context, Result};
use futures::StreamExt;
use serde::Serialize;
use tokio::io::AsyncRead;
use tokio::net::TcpListener;
use tokio_util::codec::FramedRead;

use ow_connector::LoopbackDialer;
use ow_core::Port;
use ow_protocol::{Command, DeflateCodec, ProtocolError};

use crate::output::{print_info, print_json, print_success, print_warning};

#[derive(Serialize)]
struct Received<'a> {
    kind: &'static str,
    text: &'a str,
}

/// Read one connection to EOF and decode its command
///
/// Returns `None` for a connection that closed without sending anything.
pub async fn receive_command<S>(stream: S) -> Result<Option<Command>, ProtocolError>
where
    S: AsyncRead + Unpin,
{
    let mut frames = FramedRead::new(stream, DeflateCodec::new());
    match frames.next().await {
        Some(Ok(payload)) => {
            let text = std::str::from_utf8(payload.as_bytes())?;
            Ok(Some(Command::parse(text)))
        }
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Accept connections on a loopback port and print what arrives
///
/// With `once`, stops after the first connection that carried a command.
pub async fn listen_command(port: Port, once: bool, json: bool) -> Result<()> {
    let addr = LoopbackDialer::address(port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to listen on {}", addr))?;

    if !json {
        print_info(&format!("Listening on {} (Ctrl+C to stop)", addr));
    }

    loop {
        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping listener");
                break;
            }
        };

        match receive_command(socket).await {
            Ok(Some(command)) => {
                let text = command.to_string();
                if json {
                    print_json(&Received {
                        kind: command.kind(),
                        text: &text,
                    })?;
                } else {
                    print_success(&format!("{} from {}: {}", command.kind(), peer, text));
                }
                if once {
                    break;
                }
            }
            Ok(None) => {
                if !json {
                    print_info(&format!("Probe connection from {} (no payload)", peer));
                }
            }
            Err(e) => print_warning(&format!("Bad stream from {}: {}", peer, e)),
        }
    }

    Ok(())
}
