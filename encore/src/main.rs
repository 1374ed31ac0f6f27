//! # Encore CLI Entry Point
//!
//! The main executable for the `encore db` and `encore gen` commands. This file drives the
//! application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and sets up logging.
//! 2. **Resolution**: Locates the application and, where needed, validates the arguments before
//!    anything is sent to the daemon.
//! 3. **Execution**: Connects to the daemon and delegates to `encore_core::commands`.
//! 4. **Presentation**: Prints errors to standard error and exits with the resulting code.
mod cli;
mod formatter;
mod logging;

use clap::Parser;
use cli::{Cli, Commands, DbCommands, GenCommands};
use encore_core::{
    AppRoot, DaemonClient, Error,
    commands::{self, ConnectOptions, GenClientOptions, ProxyOptions, ResetOptions},
    resolve::GoPackageResolver,
};
use formatter::FormattedString;
use std::process;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    logging::init(args.verbose);

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprint!("{}", FormattedString::from(&err));
            err.exit_code()
        }
    };

    process::exit(code);
}

async fn run(args: Cli) -> Result<i32, Error> {
    let Cli {
        daemon_addr,
        command,
        ..
    } = args;

    match command {
        Commands::Db { sub } => run_db(&daemon_addr, sub).await,
        Commands::Gen {
            sub:
                GenCommands::Client {
                    app_id,
                    output,
                    lang,
                    env,
                },
        } => {
            let options = GenClientOptions {
                app_id,
                output,
                lang,
                env,
            };
            // Fail on missing flags before reaching out to the daemon.
            options.language()?;

            let mut client = DaemonClient::connect(&daemon_addr).await?;
            commands::gen_client(&mut client, options, &mut tokio::io::stdout()).await?;
            Ok(0)
        }
    }
}

async fn run_db(daemon_addr: &str, command: DbCommands) -> Result<i32, Error> {
    let current_dir = std::env::current_dir().map_err(|source| Error::Io {
        context: "could not determine the working directory".to_string(),
        source,
    })?;
    let app_root = AppRoot::locate(&current_dir)?;
    let resolver = GoPackageResolver::default();

    match command {
        DbCommands::Reset { services, all } => {
            let options = ResetOptions { services, all };
            options.validate()?;

            let mut client = DaemonClient::connect(daemon_addr).await?;
            commands::reset(
                &mut client,
                &app_root,
                &resolver,
                options,
                &mut tokio::io::stdout(),
                &mut tokio::io::stderr(),
            )
            .await
        }
        DbCommands::Shell { service, env } => {
            let options = ConnectOptions {
                service,
                env: env.env,
            };

            let mut client = DaemonClient::connect(daemon_addr).await?;
            commands::shell(&mut client, &app_root, &resolver, options).await
        }
        DbCommands::ConnUri { service, env } => {
            let options = ConnectOptions {
                service,
                env: env.env,
            };

            let mut client = DaemonClient::connect(daemon_addr).await?;
            commands::conn_uri(
                &mut client,
                &app_root,
                &resolver,
                options,
                &mut tokio::io::stdout(),
            )
            .await?;
            Ok(0)
        }
        DbCommands::Proxy { env, port } => {
            let options = ProxyOptions { env: env.env, port };

            let mut client = DaemonClient::connect(daemon_addr).await?;
            commands::proxy(
                &mut client,
                &app_root,
                options,
                &mut tokio::io::stdout(),
                &mut tokio::io::stderr(),
                interrupted(),
            )
            .await
        }
    }
}

/// Completes on the first interrupt signal.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for interrupts");
        std::future::pending::<()>().await;
    }
}
