use clap::{ArgAction, Parser};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

#[derive(Parser)]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// The request url,like https://www.google.com
    pub url: String,
    /// How many times the DNS lookup is repeated for the averaged figure.
    #[arg(
        value_name = "dns_attempts",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub dns_attempts: u32,
    ///  Send User-Agent <name> to server
    #[arg(
        short = 'A',
        long = "user-agent",
        value_name = "name",
        default_value = BROWSER_USER_AGENT
    )]
    pub user_agent: String,
    /// Print the report as JSON instead of a table.
    #[arg(short = 'j', long = "json")]
    pub json: bool,
    /// Deadline in seconds applied to every stage of the probe.
    #[arg(
        long = "stage-timeout",
        value_name = "seconds",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub stage_timeout: u64,
    ///  Make the operation more talkative
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}
