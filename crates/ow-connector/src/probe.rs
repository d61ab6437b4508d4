//! Sequential multi-port probing

use ow_core::traits::PortProbe;
use ow_core::Port;
use ow_protocol::Payload;

/// Try each port in order and return the first that succeeds
///
/// Attempts run one after another, never in parallel, so a payload reaches
/// at most one port. Worst-case wall time is `ports.len()` attempt deadlines.
pub async fn probe_all_ports<P: PortProbe + ?Sized>(
    probe: &P,
    ports: &[Port],
    payload: Option<&Payload>,
) -> Option<Port> {
    for &port in ports {
        let result = probe.attempt(port, payload).await;
        if result.is_success() {
            tracing::info!("Attached to port {}", port);
            return Some(port);
        }
        tracing::debug!("Auto-attach failed on port {}: {}", port, result);
    }
    tracing::warn!("Failed to connect on all ports");
    None
}
