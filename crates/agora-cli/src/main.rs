//! AgoraNet CLI binary entrypoint.
//!
//! This is the main entry point for the `agora` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use agora_client::{Config, Session, SubprocessSigner};
use agora_cli::cli::{Cli, Commands};
use agora_cli::commands::{
    AuthCommand, DiscoverCommand, IdentityCommand, MsgCommand, NotificationsCommand, PostCommand,
    ProfileCommand, SettingsCommand, StoreCommand, UserCommand, WebhookCommand,
};
use agora_cli::error::CliError;
use agora_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let debug = cli.debug;

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if debug {
                use std::error::Error;
                let mut source = e.source();
                while let Some(cause) = source {
                    eprintln!("  caused by: {cause}");
                    source = cause.source();
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::new(&cli.api_url, &cli.did, &cli.private_key)?;
    if let Some(path) = &cli.token_path {
        config = config.with_token_path(path);
    }
    if let Some(path) = &cli.signer_path {
        config = config.with_signer_path(path);
    }

    let signer = SubprocessSigner::new(&config);
    let session = Session::new(config, signer);
    debug!(api_url = %session.config().api_url, "session ready");

    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Auth => {
            let cmd = AuthCommand::new(&session);
            cmd.authenticate(&mut stdout, &format).await?;
        }
        Commands::Sign { message } => {
            let cmd = AuthCommand::new(&session);
            cmd.sign(&mut stdout, &format, &message.join(" ")).await?;
        }
        Commands::Profile { command } => {
            let cmd = ProfileCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Post { command } => {
            let cmd = PostCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::User { command } => {
            let cmd = UserCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Search(args) => {
            let cmd = DiscoverCommand::new(&session);
            cmd.search(&mut stdout, &format, &args).await?;
        }
        Commands::Trending { limit } => {
            let cmd = DiscoverCommand::new(&session);
            cmd.trending(&mut stdout, &format, limit).await?;
        }
        Commands::Suggested { limit } => {
            let cmd = DiscoverCommand::new(&session);
            cmd.suggested(&mut stdout, &format, limit).await?;
        }
        Commands::Activities { limit } => {
            let cmd = DiscoverCommand::new(&session);
            cmd.activities(&mut stdout, &format, limit).await?;
        }
        Commands::Notifications { command } => {
            let cmd = NotificationsCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Msg { command } => {
            let cmd = MsgCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Settings { command } => {
            let cmd = SettingsCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Webhook { command } => {
            let cmd = WebhookCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Identity { command } => {
            let cmd = IdentityCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Store { command } => {
            let cmd = StoreCommand::new(&session);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
    }

    Ok(())
}
