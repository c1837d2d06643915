use clap::Parser;
use mine_safety_officer::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
    }
}
