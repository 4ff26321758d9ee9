use crate::dns::handler::ResolutionResult;
use crate::http::handler::TransferResult;
use crate::tcp::handler::ConnectionResult;
use crate::tls::handler::HandshakeResult;
use serde::Serialize;

/// Flat metric set handed to the renderer, derived read-only from the four
/// stage results. `total_connection_ms` is the directly-measured interval
/// from immediately-after-resolution to end-of-transfer, so the composite
/// totals carry no rounding drift from summed sub-metrics.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    pub url: String,
    pub dns_attempts: u32,
    pub dns_lookup_avg_ms: f64,
    pub dns_lookup_latest_ms: f64,
    pub tcp_connect_ms: f64,
    pub tls_handshake_ms: f64,
    pub pre_transfer_ms: f64,
    pub redirect_ms: f64,
    pub ttfb_ms: f64,
    pub content_transfer_ms: f64,
    pub total_connection_ms: f64,
    pub total_with_dns_ms: f64,
    /// None when the body arrived in zero measurable time; rendered as N/A.
    pub download_speed_bps: Option<f64>,
    pub content_size_bytes: u64,
    pub upload_speed_bps: f64,
    pub remote_addr: String,
    pub local_addr: String,
    pub status_code: u16,
    pub reason_phrase: String,
}

impl LatencyReport {
    pub fn build(
        url: &str,
        dns_attempts: u32,
        resolution: &ResolutionResult,
        connection: &ConnectionResult,
        handshake: &HandshakeResult,
        transfer: &TransferResult,
        total_connection_ms: f64,
    ) -> Self {
        let pre_transfer_ms = connection.connect_latency_ms + handshake.handshake_latency_ms;
        // DNS time is excluded from the connection total by definition and
        // added back only in the with-DNS composite.
        let total_with_dns_ms = resolution.latest_latency_ms + total_connection_ms;
        let download_speed_bps = (transfer.body_latency_ms > 0.0)
            .then(|| transfer.body_byte_count as f64 * 1000.0 / transfer.body_latency_ms);

        LatencyReport {
            url: url.to_string(),
            dns_attempts,
            dns_lookup_avg_ms: resolution.average_latency_ms,
            dns_lookup_latest_ms: resolution.latest_latency_ms,
            tcp_connect_ms: connection.connect_latency_ms,
            tls_handshake_ms: handshake.handshake_latency_ms,
            pre_transfer_ms,
            redirect_ms: 0.0,
            ttfb_ms: transfer.header_latency_ms,
            content_transfer_ms: transfer.body_latency_ms,
            total_connection_ms,
            total_with_dns_ms,
            download_speed_bps,
            content_size_bytes: transfer.body_byte_count,
            upload_speed_bps: 0.0,
            remote_addr: connection.remote_addr.to_string(),
            local_addr: connection.local_addr.to_string(),
            status_code: transfer.status_code,
            reason_phrase: transfer.reason_phrase.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, SocketAddr};

    fn resolution(avg: f64, latest: f64) -> ResolutionResult {
        ResolutionResult {
            addresses: vec![IpAddr::from([93, 184, 216, 34])],
            average_latency_ms: avg,
            latest_latency_ms: latest,
        }
    }

    fn connection(connect_ms: f64) -> ConnectionResult {
        ConnectionResult {
            remote_addr: SocketAddr::from(([93, 184, 216, 34], 443)),
            local_addr: SocketAddr::from(([192, 168, 1, 10], 54321)),
            connect_latency_ms: connect_ms,
        }
    }

    fn transfer(status: u16, header_ms: f64, body_ms: f64, bytes: u64) -> TransferResult {
        TransferResult {
            status_code: status,
            reason_phrase: if status == 404 { "Not Found" } else { "OK" }.to_string(),
            header_latency_ms: header_ms,
            body_latency_ms: body_ms,
            body_byte_count: bytes,
        }
    }

    fn build(
        dns_avg: f64,
        dns_latest: f64,
        connect_ms: f64,
        tls_ms: f64,
        t: TransferResult,
        total_connection_ms: f64,
    ) -> LatencyReport {
        LatencyReport::build(
            "https://example.com/",
            3,
            &resolution(dns_avg, dns_latest),
            &connection(connect_ms),
            &HandshakeResult {
                handshake_latency_ms: tls_ms,
            },
            &t,
            total_connection_ms,
        )
    }

    #[test]
    fn pre_transfer_is_connect_plus_handshake() {
        let report = build(10.0, 10.0, 50.0, 80.0, transfer(200, 120.0, 500.0, 1000), 750.0);
        assert!((report.pre_transfer_ms - 130.0).abs() < 1e-9);
    }

    #[test]
    fn dns_is_only_counted_in_the_with_dns_composite() {
        let report = build(12.5, 9.5, 50.0, 80.0, transfer(200, 120.0, 500.0, 1000), 750.0);
        assert!((report.total_connection_ms - 750.0).abs() < 1e-9);
        assert!(
            (report.total_with_dns_ms - report.total_connection_ms
                - report.dns_lookup_latest_ms)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn download_speed_matches_bytes_over_body_time() {
        let report = build(10.0, 10.0, 50.0, 80.0, transfer(200, 120.0, 500.0, 1000), 750.0);
        let speed = report.download_speed_bps.unwrap();
        assert!((speed - 2000.0).abs() < 1e-9);
        // speed * seconds recovers the byte count
        let recovered = speed * (report.content_transfer_ms / 1000.0);
        assert!((recovered - report.content_size_bytes as f64).abs() < 1e-6);
    }

    #[test]
    fn zero_body_latency_yields_no_speed() {
        let report = build(10.0, 10.0, 50.0, 80.0, transfer(200, 120.0, 0.0, 1000), 250.0);
        assert!(report.download_speed_bps.is_none());
    }

    #[test]
    fn a_404_response_still_produces_a_full_report() {
        let report = build(10.0, 10.0, 50.0, 80.0, transfer(404, 120.0, 5.0, 9), 260.0);
        assert_eq!(report.status_code, 404);
        assert_eq!(report.reason_phrase, "Not Found");
        assert_eq!(report.content_size_bytes, 9);
        assert!((report.redirect_ms - 0.0).abs() < f64::EPSILON);
        assert!((report.upload_speed_bps - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = build(10.0, 10.0, 50.0, 80.0, transfer(200, 120.0, 0.0, 0), 250.0);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"download_speed_bps\":null"));
        assert!(json.contains("\"status_code\":200"));
    }
}
