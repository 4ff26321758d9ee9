use crate::error::ProbeError;
use crate::target::Target;
use crate::timing::{elapsed_ms, Clock};
use crate::tls::handler::client_tls_config;
use bytes::Bytes;
use http::header::{ACCEPT, USER_AGENT};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tokio::time::timeout;

/// Outcome of the transfer stage. Non-2xx/3xx statuses are data here, not
/// errors; redirects are not followed, so whatever the first response
/// carries is final.
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub status_code: u16,
    pub reason_phrase: String,
    pub header_latency_ms: f64,
    pub body_latency_ms: f64,
    pub body_byte_count: u64,
}

/// Issue one GET for the target URL on a fresh client, timing receipt of the
/// response headers separately from draining the body. The client shares no
/// socket or session state with the handshake stage.
pub async fn fetch_url<C: Clock>(
    clock: &C,
    target: &Target,
    user_agent: &str,
    deadline: Duration,
) -> Result<TransferResult, ProbeError> {
    let tls_config =
        client_tls_config().map_err(|e| ProbeError::transfer(format!("TLS config: {}", e)))?;

    let mut connector = HttpConnector::new();
    connector.enforce_http(false);
    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .wrap_connector(connector);
    let client: Client<_, Full<Bytes>> =
        Client::builder(TokioExecutor::new()).build(https_connector);

    let request = Request::builder()
        .method("GET")
        .uri(target.url.as_str())
        .header(USER_AGENT, user_agent)
        .header(ACCEPT, "*/*")
        .body(Full::new(Bytes::new()))
        .map_err(|e| ProbeError::transfer(format!("building request: {}", e)))?;
    debug!("> GET {}", target.url);

    let start = clock.now();
    let response = timeout(deadline, client.request(request))
        .await
        .map_err(|_| {
            ProbeError::transfer(format!(
                "request to {} timed out after {:?}",
                target.url, deadline
            ))
        })?
        .map_err(|e| ProbeError::transfer(format!("{}: {}", target.url, e)))?;
    let header_latency_ms = elapsed_ms(start, clock.now());

    let status = response.status();
    debug!("< {:?} {}", response.version(), status);

    let body_start = clock.now();
    let body_byte_count = timeout(deadline, read_body(response.into_body()))
        .await
        .map_err(|_| {
            ProbeError::transfer(format!("body read timed out after {:?}", deadline))
        })??;
    let body_latency_ms = elapsed_ms(body_start, clock.now());

    Ok(TransferResult {
        status_code: status.as_u16(),
        reason_phrase: status.canonical_reason().unwrap_or("Unknown").to_string(),
        header_latency_ms,
        body_latency_ms,
        body_byte_count,
    })
}

async fn read_body(mut body: Incoming) -> Result<u64, ProbeError> {
    let mut byte_count: u64 = 0;
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| ProbeError::transfer(format!("reading body: {}", e)))?;
        if let Some(data) = frame.data_ref() {
            byte_count += data.len() as u64;
        }
    }
    Ok(byte_count)
}
