use async_trait::async_trait;
use tokio::net::TcpStream;

use certwatch_common::error::ProbeError;
use certwatch_common::network::target::Target;

use crate::prober::Dialer;

/// Plain TCP connect. Name resolution happens here as well.
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, target: &Target) -> Result<TcpStream, ProbeError> {
        TcpStream::connect((target.host(), target.port()))
            .await
            .map_err(|e| ProbeError::ConnectionFailed(e.to_string()))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
