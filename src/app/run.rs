use crate::cli::app_config::Cli;
use crate::dns::handler::resolve_host;
use crate::http::handler::fetch_url;
use crate::report::metrics::LatencyReport;
use crate::report::table;
use crate::target::Target;
use crate::tcp::handler::connect_first;
use crate::timing::{elapsed_ms, Clock, SystemClock};
use crate::tls::handler::handshake_only;
use clap::Parser;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

pub async fn main_with_error() -> Result<(), anyhow::Error> {
    let cli: Cli = Cli::parse();

    do_probe(cli).await
}

async fn do_probe(cli: Cli) -> Result<(), anyhow::Error> {
    let log_level = match cli.verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy()
        .add_directive("hyper_util=off".parse()?);
    let subscriber = tracing_subscriber::fmt()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_max_level(log_level)
        .with_env_filter(filter)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let target = Target::from_url(&cli.url)?;
    let deadline = Duration::from_secs(cli.stage_timeout);
    let clock = SystemClock;

    println!(
        "Checking latency for {} with {} DNS attempts...\n",
        target.url, cli.dns_attempts
    );

    let resolution = resolve_host(&clock, &target.host, cli.dns_attempts, deadline).await?;

    // Everything below this clock sample counts toward the connection total;
    // DNS is added back only in the with-DNS composite.
    let connection_start = clock.now();

    let (stream, connection) =
        connect_first(&clock, &resolution.addresses, target.port, deadline).await?;
    let handshake = handshake_only(&clock, stream, &target.host, deadline).await?;
    let transfer = fetch_url(&clock, &target, &cli.user_agent, deadline).await?;

    // Measured directly rather than summed from the per-stage figures so the
    // composite carries no rounding drift.
    let total_connection_ms = elapsed_ms(connection_start, clock.now());

    let report = LatencyReport::build(
        &target.url,
        cli.dns_attempts,
        &resolution,
        &connection,
        &handshake,
        &transfer,
        total_connection_ms,
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", table::render(&report));
        println!();
        println!("Status Code: {} {}", report.status_code, report.reason_phrase);
        println!("Latency check completed.");
    }

    Ok(())
}
