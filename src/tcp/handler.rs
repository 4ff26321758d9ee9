use crate::error::ProbeError;
use crate::timing::{elapsed_ms, Clock};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Endpoints and latency of the transport connection. The stream itself is
/// returned separately and is owned by the handshake stage afterwards; it is
/// never shared with the HTTP client.
#[derive(Debug, Clone)]
pub struct ConnectionResult {
    pub remote_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub connect_latency_ms: f64,
}

/// Open a TCP connection to the first resolved address. Only the first
/// address is attempted; there is no fallback to alternates.
pub async fn connect_first<C: Clock>(
    clock: &C,
    addresses: &[IpAddr],
    port: u16,
    deadline: Duration,
) -> Result<(TcpStream, ConnectionResult), ProbeError> {
    let ip = addresses
        .first()
        .copied()
        .ok_or_else(|| ProbeError::connection("no resolved address to connect to".to_string()))?;
    let addr = SocketAddr::new(ip, port);
    debug!("Connecting to {}", addr);

    let start = clock.now();
    let stream = timeout(deadline, TcpStream::connect(addr))
        .await
        .map_err(|_| {
            ProbeError::connection(format!("connect to {} timed out after {:?}", addr, deadline))
        })?
        .map_err(|e| ProbeError::connection(format!("{}: {}", addr, e)))?;
    let connect_latency_ms = elapsed_ms(start, clock.now());

    let remote_addr = stream
        .peer_addr()
        .map_err(|e| ProbeError::connection(format!("peer address: {}", e)))?;
    let local_addr = stream
        .local_addr()
        .map_err(|e| ProbeError::connection(format!("local address: {}", e)))?;
    debug!("Connected {} -> {}", local_addr, remote_addr);

    Ok((
        stream,
        ConnectionResult {
            remote_addr,
            local_addr,
            connect_latency_ms,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::SystemClock;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_first_address_and_reports_endpoints() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let addresses = vec![IpAddr::from([127, 0, 0, 1])];
        let (stream, result) = connect_first(
            &SystemClock,
            &addresses,
            port,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(result.remote_addr.port(), port);
        assert_eq!(result.local_addr.ip(), stream.local_addr().unwrap().ip());
        assert!(result.connect_latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn empty_address_set_is_a_connection_error() {
        let result = connect_first(&SystemClock, &[], 443, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProbeError::Connection(_))));
    }
}
