use clap::Parser;
use kubegen::cli::{run_cli, Cli};
use kubegen::logging;

fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    run_cli(Cli::parse())
}
