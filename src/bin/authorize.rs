use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use contact_relay::authorization::{Authorizer, CodePrompt, EnvPrompt, TerminalPrompt};
use contact_relay::bootstrap;
use contact_relay::configuration::get_configuration;
use contact_relay::telemetry::{get_subscriber, init_subscriber};

/// Environment variable read by `login --code-from-env`.
const CODE_VAR: &str = "AUTHORIZATION_CODE";

/// Obtain and manage the Gmail token used by the contact form relay.
#[derive(Parser, Debug)]
#[command(name = "authorize")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the authorization code exchange and store the resulting token.
    Login {
        /// Read the code from $AUTHORIZATION_CODE instead of the terminal.
        #[arg(long)]
        code_from_env: bool,
        /// Replace a token that is already stored.
        #[arg(long)]
        force: bool,
    },
    /// Trade the stored refresh token for a new access token.
    Refresh,
    /// Print the credentials and token as environment variable assignments.
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout belongs to the prompt and the export output.
    let subscriber = get_subscriber("authorize".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber);

    let config = get_configuration().context("Failed to read configuration")?;
    let prompt: Arc<dyn CodePrompt> = match &args.command {
        Command::Login {
            code_from_env: true,
            ..
        } => Arc::new(EnvPrompt::new(CODE_VAR)),
        _ => Arc::new(TerminalPrompt),
    };
    let authorizer = Authorizer::new(config.storage.store(), config.gmail.oauth_client(), prompt);

    let vars = config.storage.export_vars();
    let mut out = std::io::stdout();

    match args.command {
        Command::Login { force, .. } => bootstrap::login(&authorizer, force, &vars, &mut out).await,
        Command::Refresh => bootstrap::refresh(&authorizer, &vars, &mut out).await,
        Command::Export => bootstrap::export(&authorizer, &vars, &mut out).await,
    }
}
