//! The operations behind the `authorize` binary.
//!
//! Output meant for the operator goes to `out`; logs go through `tracing`.

use std::io::Write;

use anyhow::Context;
use secrecy::ExposeSecret;

use crate::authorization::{Authorizer, ClientCredentials, Token};

/// Names of the environment variables a hosted deployment reads the
/// credentials and token from.
#[derive(Debug, Clone)]
pub struct ExportVars {
    pub credentials_var: String,
    pub token_var: String,
}

/// Runs the code exchange unless a usable token is already stored.
///
/// A stored token that cannot be read does not count: it gets replaced.
pub async fn login<W: Write>(
    authorizer: &Authorizer,
    force: bool,
    vars: &ExportVars,
    out: &mut W,
) -> anyhow::Result<()> {
    if !force {
        match authorizer.store().load_token().await {
            Ok(Some(_)) => {
                writeln!(
                    out,
                    "A token is already stored at {}. Pass --force to replace it.",
                    authorizer.store().token_location()
                )?;
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                "Stored token is unusable, replacing it"
            ),
        }
    }

    let client = authorizer.login().await?;
    report_stored(authorizer, client.credentials(), client.token(), vars, out)
}

/// Trades the stored refresh token for a new access token.
pub async fn refresh<W: Write>(
    authorizer: &Authorizer,
    vars: &ExportVars,
    out: &mut W,
) -> anyhow::Result<()> {
    let client = authorizer.refresh().await?;
    report_stored(authorizer, client.credentials(), client.token(), vars, out)
}

/// Prints the stored credentials and token as environment variable assignments.
pub async fn export<W: Write>(
    authorizer: &Authorizer,
    vars: &ExportVars,
    out: &mut W,
) -> anyhow::Result<()> {
    let credentials = authorizer.store().load_credentials().await?;
    let token = authorizer
        .store()
        .load_token()
        .await?
        .context("No token is stored. Run `authorize login` first.")?;
    write_assignments(&credentials, &token, vars, out)
}

fn report_stored<W: Write>(
    authorizer: &Authorizer,
    credentials: &ClientCredentials,
    token: &Token,
    vars: &ExportVars,
    out: &mut W,
) -> anyhow::Result<()> {
    if authorizer.store().outlives_process() {
        writeln!(out, "Token stored to {}", authorizer.store().token_location())?;
    } else {
        // The token only lived in this process: hand it over before exiting.
        write_assignments(credentials, token, vars, out)?;
    }
    if let Some(expires_at) = token.expires_at() {
        writeln!(out, "The access token expires at {}", expires_at.to_rfc3339())?;
    }
    Ok(())
}

fn write_assignments<W: Write>(
    credentials: &ClientCredentials,
    token: &Token,
    vars: &ExportVars,
    out: &mut W,
) -> anyhow::Result<()> {
    writeln!(out, "Set the following before deploying:\n")?;
    writeln!(out, "{}='{}'", vars.credentials_var, credentials.to_env_value())?;
    writeln!(out, "{}='{}'", vars.token_var, token.to_env_value()?)?;
    if token
        .refresh_token
        .as_ref()
        .map_or(true, |t| t.expose_secret().is_empty())
    {
        writeln!(
            out,
            "warning: the token has no refresh token, it will stop working once it expires"
        )?;
    }
    Ok(())
}
