use clap::Parser;

use enclosure_gen::cli::{run, Cli};
use enclosure_gen::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;

    run(&cli)
}
