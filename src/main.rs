use anyhow::Result;
use clap::Parser;
use tally::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    tally::logging::init_tracing(cli.verbose);
    cli.run()
}
