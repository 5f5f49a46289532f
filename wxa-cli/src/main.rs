//! WXA CLI - Command line tool for radar and rainfall storm playback.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wxa-cli",
    version,
    about = "Weather radar and rain gauge animation toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wxa_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("starting wxa-cli");
    wxa_cmd::run(cli.command)
}
