use crate::error::ProbeError;
use crate::timing::{elapsed_ms, Clock};
use pki_types::ServerName;
use rustls::crypto::ring::{default_provider, DEFAULT_CIPHER_SUITES};
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

/// Latency of the TLS negotiation alone. The session object never leaves
/// the stage.
#[derive(Debug, Clone)]
pub struct HandshakeResult {
    pub handshake_latency_ms: f64,
}

/// Client configuration shared by the handshake stage and the HTTP client:
/// webpki roots, ring provider, default cipher suites and versions.
pub fn client_tls_config() -> Result<ClientConfig, rustls::Error> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::CryptoProvider {
        cipher_suites: DEFAULT_CIPHER_SUITES.to_vec(),
        ..default_provider()
    });

    Ok(ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(rustls::DEFAULT_VERSIONS)?
        .with_root_certificates(root_store)
        .with_no_client_auth())
}

/// Perform a TLS handshake over the already-open connection, verifying the
/// server by the original hostname, then tear the connection down. The
/// secured stream is deliberately not reused for the HTTP request: the HTTP
/// client pools its own connections, and reusing this one would fold pool
/// behavior into the handshake figure. The server is therefore contacted
/// twice per run.
pub async fn handshake_only<C: Clock>(
    clock: &C,
    stream: TcpStream,
    host: &str,
    deadline: Duration,
) -> Result<HandshakeResult, ProbeError> {
    let tls_config =
        client_tls_config().map_err(|e| ProbeError::handshake(format!("TLS config: {}", e)))?;
    let connector = TlsConnector::from(Arc::new(tls_config));
    let domain = ServerName::try_from(host.to_string())
        .map_err(|e| ProbeError::handshake(format!("invalid server name {}: {}", host, e)))?;
    debug!("TLS handshake with {}", host);

    let start = clock.now();
    let tls_stream = timeout(deadline, connector.connect(domain, stream))
        .await
        .map_err(|_| {
            ProbeError::handshake(format!(
                "handshake with {} timed out after {:?}",
                host, deadline
            ))
        })?
        .map_err(|e| ProbeError::handshake(format!("{}: {}", host, e)))?;
    let handshake_latency_ms = elapsed_ms(start, clock.now());

    drop(tls_stream);

    Ok(HandshakeResult {
        handshake_latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_config_builds_with_webpki_roots() {
        let config = client_tls_config().unwrap();
        // no ALPN: the handshake stage never speaks HTTP on this connection
        assert!(config.alpn_protocols.is_empty());
    }

    #[tokio::test]
    async fn handshake_against_plain_listener_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // accept and close immediately, no TLS on the other side
            let _ = listener.accept().await;
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let result = handshake_only(
            &crate::timing::SystemClock,
            stream,
            "localhost",
            Duration::from_secs(2),
        )
        .await;
        assert!(matches!(result, Err(ProbeError::Handshake(_))));
    }
}
