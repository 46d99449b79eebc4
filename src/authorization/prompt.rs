use std::io::Write;

use anyhow::Context;

use crate::telemetry::spawn_blocking_with_tracing;

/// Hands the authorization URL to a human and returns the code they got back.
#[async_trait::async_trait]
pub trait CodePrompt: Send + Sync {
    async fn read_code(&self, authorization_url: &str) -> Result<String, anyhow::Error>;
}

/// Asks on the terminal.
pub struct TerminalPrompt;

#[async_trait::async_trait]
impl CodePrompt for TerminalPrompt {
    async fn read_code(&self, authorization_url: &str) -> Result<String, anyhow::Error> {
        println!("Authorize this app by visiting this url: {}", authorization_url);
        print!("Enter the code from that page here: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = spawn_blocking_with_tracing(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .context("Failed to spawn blocking task")?
        .context("Failed to read the authorization code from stdin")?;

        non_empty_code(line)
    }
}

/// Reads a code that was recorded ahead of time in an environment variable.
pub struct EnvPrompt {
    var: String,
}

impl EnvPrompt {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait::async_trait]
impl CodePrompt for EnvPrompt {
    async fn read_code(&self, authorization_url: &str) -> Result<String, anyhow::Error> {
        tracing::info!(%authorization_url, var = %self.var, "Using the pre-recorded authorization code");
        let code = std::env::var(&self.var)
            .with_context(|| format!("${} does not hold an authorization code", self.var))?;
        non_empty_code(code)
    }
}

/// For processes that must never block on a human, such as the HTTP server.
pub struct UnattendedPrompt;

#[async_trait::async_trait]
impl CodePrompt for UnattendedPrompt {
    async fn read_code(&self, authorization_url: &str) -> Result<String, anyhow::Error> {
        tracing::warn!(%authorization_url, "No token available and no one to ask for a code");
        Err(anyhow::anyhow!(
            "No token is stored. Run the `authorize` binary to obtain one."
        ))
    }
}

fn non_empty_code(code: String) -> Result<String, anyhow::Error> {
    let code = code.trim();
    if code.is_empty() {
        anyhow::bail!("The authorization code is empty");
    }
    Ok(code.to_string())
}
