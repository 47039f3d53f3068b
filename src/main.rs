use anyhow::Result;
use clap::Parser;
use grid_allocator::{cli, telemetry};
use cli::Cli;
use telemetry::init_tracing;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    cli::run(cli)
}
