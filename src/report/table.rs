use crate::report::metrics::LatencyReport;
use std::fmt::Write;

const LABEL_WIDTH: usize = 34;

/// Render the column-aligned metric table. Every duration is printed with
/// two decimals; speeds as whole bytes per second.
pub fn render(report: &LatencyReport) -> String {
    let rows = [
        (
            format!("DNS Lookup (avg of {} attempts)", report.dns_attempts),
            format_ms(report.dns_lookup_avg_ms),
        ),
        ("DNS Lookup (latest)".to_string(), format_ms(report.dns_lookup_latest_ms)),
        ("TCP Connection".to_string(), format_ms(report.tcp_connect_ms)),
        ("TLS Handshake".to_string(), format_ms(report.tls_handshake_ms)),
        ("Pre-transfer".to_string(), format_ms(report.pre_transfer_ms)),
        ("Redirect Time".to_string(), format_ms(report.redirect_ms)),
        ("Time to First Byte (TTFB)".to_string(), format_ms(report.ttfb_ms)),
        (
            "Content Transfer".to_string(),
            format_ms(report.content_transfer_ms),
        ),
        (
            "Total Connection Time (no DNS)".to_string(),
            format_ms(report.total_connection_ms),
        ),
        (
            "Total Time (with latest DNS)".to_string(),
            format_ms(report.total_with_dns_ms),
        ),
        ("Download Speed".to_string(), format_speed(report.download_speed_bps)),
        (
            "Content Size".to_string(),
            format!("{} bytes", report.content_size_bytes),
        ),
        ("Upload Speed".to_string(), format_speed(Some(report.upload_speed_bps))),
        ("Remote Address".to_string(), report.remote_addr.clone()),
        ("Local Address".to_string(), report.local_addr.clone()),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", "Metric", "Value");
    let _ = writeln!(out, "{}", "-".repeat(LABEL_WIDTH + 22));
    for (label, value) in rows {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", label, value);
    }
    out
}

fn format_ms(ms: f64) -> String {
    format!("{:.2} ms", ms)
}

fn format_speed(bps: Option<f64>) -> String {
    match bps {
        Some(v) => format!("{:.0} B/s", v),
        None => "N/A".to_string(),
    }
}
