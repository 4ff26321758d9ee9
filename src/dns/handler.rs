use crate::error::ProbeError;
use crate::timing::{elapsed_ms, Clock};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;

/// Outcome of the resolver stage. The address set always comes from the
/// final attempt; earlier attempts only contribute their timing.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub addresses: Vec<IpAddr>,
    pub average_latency_ms: f64,
    pub latest_latency_ms: f64,
}

/// Resolve `host` `attempts` times sequentially, timing each attempt.
pub async fn resolve_host<C: Clock>(
    clock: &C,
    host: &str,
    attempts: u32,
    deadline: Duration,
) -> Result<ResolutionResult, ProbeError> {
    debug!("Resolving DNS for: {} ({} attempts)", host, attempts);

    // 使用系统 DNS（等价于 dig 默认）
    let resolver = TokioResolver::builder(TokioConnectionProvider::default())
        .map_err(|e| ProbeError::resolution(format!("resolver configuration: {}", e)))?
        .build();

    let result = measure_attempts(clock, attempts, || {
        let resolver = resolver.clone();
        let host = host.to_string();
        async move {
            let lookup = timeout(deadline, resolver.lookup_ip(host.as_str()))
                .await
                .map_err(|_| {
                    ProbeError::resolution(format!(
                        "lookup of {} timed out after {:?}",
                        host, deadline
                    ))
                })?
                .map_err(|e| ProbeError::resolution(format!("{}: {}", host, e)))?;
            let addresses: Vec<IpAddr> = lookup.iter().collect();
            if addresses.is_empty() {
                return Err(ProbeError::resolution(format!(
                    "no IP addresses found for host {}",
                    host
                )));
            }
            Ok(addresses)
        }
    })
    .await?;

    debug!("Resolved DNS for {}: {:?}", host, result.addresses);
    Ok(result)
}

/// Run `lookup` `attempts` times, returning the addresses of the last
/// attempt together with the mean latency over all attempts and the latency
/// of the final attempt alone. A single failed attempt aborts the whole
/// loop. For one attempt the average equals the latest by construction.
async fn measure_attempts<C, F, Fut>(
    clock: &C,
    attempts: u32,
    mut lookup: F,
) -> Result<ResolutionResult, ProbeError>
where
    C: Clock,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<IpAddr>, ProbeError>>,
{
    let mut total_ms = 0.0;
    let mut latest_ms = 0.0;
    let mut addresses = Vec::new();

    for _ in 0..attempts {
        let start = clock.now();
        addresses = lookup().await?;
        latest_ms = elapsed_ms(start, clock.now());
        total_ms += latest_ms;
    }

    Ok(ResolutionResult {
        addresses,
        average_latency_ms: total_ms / attempts as f64,
        latest_latency_ms: latest_ms,
    })
}
