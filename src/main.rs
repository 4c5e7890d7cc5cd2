use clap::Parser;

use kimp::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Check(command) => cli::check::execute(command).await,
    };

    if let Err(e) = result {
        eprintln!("kimp: {e}");
        std::process::exit(1);
    }
}
