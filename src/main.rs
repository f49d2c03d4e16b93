use anyhow::Result;
use clap::Parser;

use pantry::cli::handlers::{
    CommandContext, handle_init, handle_migrate, handle_mutate, handle_query, handle_serve,
};
use pantry::cli::{Cli, Commands};
use pantry::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let verbose = cli.verbose;
    let log_file = cli.log_file.as_ref().map(|f| cwd.join(f));

    // Every command except `init` runs against an existing project.
    let prepare = || -> Result<CommandContext> {
        let ctx = CommandContext::load(&cwd, cli.config.as_deref(), cli.database.as_deref())?;
        logging::init(verbose, log_file.clone().or_else(|| ctx.log_path()));
        Ok(ctx)
    };

    match cli.command {
        Commands::Init { database_path } => {
            logging::init(verbose, log_file.clone());
            handle_init(database_path)
        }
        Commands::Migrate => handle_migrate(prepare()?),
        Commands::Query { query, variables } => handle_query(prepare()?, query, variables),
        Commands::Mutate {
            mutation,
            variables,
        } => handle_mutate(prepare()?, mutation, variables),
        Commands::Serve { port, host } => handle_serve(prepare()?, port, host),
    }
}
