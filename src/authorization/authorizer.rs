use std::fmt::Formatter;
use std::sync::Arc;

use anyhow::Context;

use crate::authorization::{
    AuthorizedClient, ClientCredentials, CodePrompt, CredentialStore, OAuthClient, StoreError,
    Token, GMAIL_SEND_SCOPE,
};
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthorizeError {
    #[error("Failed to load the client credentials")]
    CredentialsError(#[source] StoreError),
    #[error("Failed to obtain a token")]
    ExchangeError(#[source] anyhow::Error),
    #[error("Failed to store the token")]
    PersistError(#[source] StoreError),
}

impl std::fmt::Debug for AuthorizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Turns stored credentials into an [`AuthorizedClient`], minting and storing
/// a token through `prompt` when none is available.
pub struct Authorizer {
    store: Arc<dyn CredentialStore>,
    oauth_client: OAuthClient,
    prompt: Arc<dyn CodePrompt>,
}

impl Authorizer {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        oauth_client: OAuthClient,
        prompt: Arc<dyn CodePrompt>,
    ) -> Self {
        Self {
            store,
            oauth_client,
            prompt,
        }
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// The stored token is trusted as-is: no expiry check happens here, Gmail
    /// decides whether it is still good.
    #[tracing::instrument(name = "Authorize Gmail client", skip(self))]
    pub async fn authorize(&self) -> Result<AuthorizedClient, AuthorizeError> {
        let credentials = self.load_credentials().await?;

        match self.store.load_token().await {
            Ok(Some(token)) => return Ok(AuthorizedClient::new(credentials, token)),
            Ok(None) => {
                tracing::info!("No token stored, starting the authorization code exchange")
            }
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                "Stored token is unusable, starting the authorization code exchange"
            ),
        }

        self.exchange(credentials).await
    }

    /// Runs the code exchange even if a token is already stored.
    #[tracing::instrument(name = "Authorize Gmail client from scratch", skip(self))]
    pub async fn login(&self) -> Result<AuthorizedClient, AuthorizeError> {
        let credentials = self.load_credentials().await?;
        self.exchange(credentials).await
    }

    /// Trades the stored refresh token for a new access token and overwrites
    /// the stored token with it.
    #[tracing::instrument(name = "Refresh stored token", skip(self))]
    pub async fn refresh(&self) -> Result<AuthorizedClient, AuthorizeError> {
        let credentials = self.load_credentials().await?;
        let token = self
            .store
            .load_token()
            .await
            .context("Failed to load the stored token")
            .map_err(AuthorizeError::ExchangeError)?
            .ok_or_else(|| AuthorizeError::ExchangeError(anyhow::anyhow!("No token is stored")))?;

        let token = self
            .oauth_client
            .refresh(&credentials, &token)
            .await
            .context("Failed to refresh the access token")
            .map_err(AuthorizeError::ExchangeError)?;
        self.persist(credentials, token).await
    }

    async fn load_credentials(&self) -> Result<ClientCredentials, AuthorizeError> {
        self.store.load_credentials().await.map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to load the client credentials");
            AuthorizeError::CredentialsError(e)
        })
    }

    async fn exchange(
        &self,
        credentials: ClientCredentials,
    ) -> Result<AuthorizedClient, AuthorizeError> {
        let authorization_url = self
            .oauth_client
            .authorization_url(&credentials, &[GMAIL_SEND_SCOPE]);

        let token = async {
            let code = self.prompt.read_code(&authorization_url).await?;
            self.oauth_client
                .exchange_code(&credentials, &code)
                .await
                .context("Failed to exchange the authorization code")
        }
        .await
        .map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Error retrieving access token");
            AuthorizeError::ExchangeError(e)
        })?;

        self.persist(credentials, token).await
    }

    async fn persist(
        &self,
        credentials: ClientCredentials,
        token: Token,
    ) -> Result<AuthorizedClient, AuthorizeError> {
        self.store.save_token(&token).await.map_err(|e| {
            tracing::error!(error.cause_chain = ?e, "Failed to store the token");
            AuthorizeError::PersistError(e)
        })?;
        tracing::info!(location = %self.store.token_location(), "Token stored");
        Ok(AuthorizedClient::new(credentials, token))
    }
}
