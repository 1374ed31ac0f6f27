//! # CLI
//!
//! This module defines the command-line interface of the `encore db` and `encore gen` commands
//! using `clap`.
//!
//! It only parses user input. Validation that needs the application (mutually exclusive flags,
//! language detection) lives in `encore_core::commands`.
use clap::{ArgAction, Args, Parser, Subcommand};
use encore_core::daemon::DEFAULT_DAEMON_ADDR;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "encore", version, about = "Encore database and code generation commands")]
pub struct Cli {
    /// Address of the Encore daemon
    #[arg(long = "daemon", global = true, env = "ENCORE_DAEMON_ADDR", default_value = DEFAULT_DAEMON_ADDR)]
    pub daemon_addr: String,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Database management commands
    Db {
        #[command(subcommand)]
        sub: DbCommands,
    },

    /// Code generation commands
    Gen {
        #[command(subcommand)]
        sub: GenCommands,
    },
}

#[derive(Args)]
pub struct EnvArg {
    /// Environment name to connect to (such as "production")
    #[arg(short, long, default_value = "")]
    pub env: String,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Resets the databases for the given services, or the current directory if unspecified
    Reset {
        /// Services to reset
        #[arg(value_name = "SERVICE")]
        services: Vec<String>,

        /// Reset all services in the application
        #[arg(long)]
        all: bool,
    },

    /// Connects to the database via psql shell
    Shell {
        /// Service whose database to connect to
        #[arg(value_name = "SERVICE")]
        service: Option<String>,

        #[command(flatten)]
        env: EnvArg,
    },

    /// Sets up a proxy tunnel to the database
    Proxy {
        #[command(flatten)]
        env: EnvArg,

        /// Port to listen on (defaults to a random port)
        #[arg(short, long, default_value_t = 0)]
        port: i32,
    },

    /// Outputs the database connection string
    ConnUri {
        /// Service whose connection string to print
        #[arg(value_name = "SERVICE")]
        service: Option<String>,

        #[command(flatten)]
        env: EnvArg,
    },
}

#[derive(Subcommand)]
pub enum GenCommands {
    /// Generates an API client for your app
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// encore gen client my-app --output client.ts
    /// encore gen client my-app --lang ts > client.ts
    /// ```
    Client {
        /// The app to generate a client for
        app_id: String,

        /// The filename to write the generated client code to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The language to generate code for (only "ts" is supported for now)
        #[arg(short, long)]
        lang: Option<String>,

        /// The environment to fetch the API for
        #[arg(short, long, default_value = "production")]
        env: String,
    },
}
