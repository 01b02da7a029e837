//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};

use voxline_cli::{Cli, Commands, bootstrap, handlers, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };
    let ctx = bootstrap(&cli)?;

    match command {
        Commands::Speak(args) => handlers::speak::execute(&ctx, args).await?,
        Commands::Voices => handlers::voices::execute(&ctx).await?,
        Commands::Config { command } => handlers::config::execute(&ctx, command)?,
    }

    Ok(())
}
