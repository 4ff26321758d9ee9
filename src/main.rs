#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate tracing;

mod app;
mod cli;
mod dns;
mod error;
mod http;
mod report;
mod target;
mod tcp;
mod timing;
mod tls;

use crate::app::run::main_with_error;

#[tokio::main]
async fn main() {
    if let Err(e) = main_with_error().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
