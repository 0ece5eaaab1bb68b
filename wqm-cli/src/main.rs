//! WQM CLI - Command line tool for flagging water-quality sampling sites.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wqm-cli",
    version,
    about = "Water-quality site flags: join samples to sites and classify their health"
)]
struct Cli {
    #[command(subcommand)]
    command: wqm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wqm_cmd::run(cli.command).await
}
