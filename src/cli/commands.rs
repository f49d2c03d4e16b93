use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pantry")]
#[command(
    author,
    version,
    about = "A GraphQL API over recipe categories and ingredients"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .pantry.toml by default)
    #[arg(long, global = true, env = "PANTRY_CONFIG")]
    pub config: Option<String>,

    /// Path to the SQLite database (overrides config)
    #[arg(long, global = true, env = "PANTRY_DATABASE")]
    pub database: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (overrides config)
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new pantry project in the current directory
    Init {
        /// Database file name, relative to the project directory
        #[arg(long)]
        database_path: Option<String>,
    },

    /// Apply pending database migrations
    Migrate,

    /// Execute a GraphQL query
    Query {
        /// GraphQL query string
        query: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Execute a GraphQL mutation (automatically wraps in 'mutation { }')
    Mutate {
        /// Mutation body (without 'mutation' keyword)
        mutation: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Start GraphQL HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },
}
