use clap::Parser;
use patchfmt_cli::Cli;
use patchfmt_cli::run_main;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli)
}
