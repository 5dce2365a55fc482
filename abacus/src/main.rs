// abacus/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr: stdout carries the command output (`show` prints JSON).
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir, files } => commands::run::execute(project_dir, files).await,
        Commands::List { project_dir } => commands::list::execute(project_dir),
        Commands::Show { id, project_dir } => commands::show::execute(project_dir, id),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
        Commands::Generate { output, rows, seed } => commands::generate::execute(output, rows, seed),
    }
}
