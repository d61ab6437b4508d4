//! Port probing trait

use async_trait::async_trait;

use crate::types::{AttemptResult, Port};
use ow_protocol::Payload;

/// Something that can reach a loopback port and optionally deliver a payload
///
/// Both operations always resolve; failures are part of the returned value
/// rather than an `Err`.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Connect to `port`, send `payload` if present, then close
    async fn attempt(&self, port: Port, payload: Option<&Payload>) -> AttemptResult;

    /// Whether something accepts connections on `port`; never writes
    async fn check_open(&self, port: Port) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct OnlyPort(Port);

    #[async_trait]
    impl PortProbe for OnlyPort {
        async fn attempt(&self, port: Port, payload: Option<&Payload>) -> AttemptResult {
            if port != self.0 {
                return AttemptResult::Timeout { port };
            }
            match payload {
                Some(p) => AttemptResult::ConnectedAndSent {
                    port,
                    bytes: p.len(),
                },
                None => AttemptResult::Connected { port },
            }
        }

        async fn check_open(&self, port: Port) -> bool {
            port == self.0
        }
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let open = Port::new(8393).unwrap();
        let probe: Arc<dyn PortProbe> = Arc::new(OnlyPort(open));

        assert!(probe.check_open(open).await);
        assert!(!probe.check_open(Port::new(8392).unwrap()).await);

        let payload = Payload::from_text("print(1)").unwrap();
        let result = probe.attempt(open, Some(&payload)).await;
        assert_eq!(result, AttemptResult::ConnectedAndSent { port: open, bytes: 8 });
    }
}
