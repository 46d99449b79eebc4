use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::authorization::{ClientCredentials, Token};

pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

#[derive(thiserror::Error, Debug)]
pub enum OAuthError {
    #[error("The token endpoint answered {status}: {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("No refresh token is available")]
    MissingRefreshToken,
    #[error("Failed to reach the token endpoint")]
    Transport(#[from] reqwest::Error),
}

/// Talks to Google's authorization and token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http_client: Client,
    authorization_endpoint: String,
    token_endpoint: String,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    token_type: Option<String>,
}

#[derive(serde::Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl OAuthClient {
    pub fn new(authorization_endpoint: String, token_endpoint: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build the OAuth http client");
        Self {
            http_client,
            authorization_endpoint,
            token_endpoint,
        }
    }

    /// The page the account owner has to visit to grant access.
    pub fn authorization_url(&self, credentials: &ClientCredentials, scopes: &[&str]) -> String {
        format!(
            "{}?access_type=offline&scope={}&response_type=code&client_id={}&redirect_uri={}",
            self.authorization_endpoint,
            urlencoding::encode(&scopes.join(" ")),
            urlencoding::encode(&credentials.client_id),
            urlencoding::encode(credentials.redirect_uri()),
        )
    }

    #[tracing::instrument(name = "Exchange authorization code", skip(self, credentials, code))]
    pub async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
    ) -> Result<Token, OAuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
            ("redirect_uri", credentials.redirect_uri()),
        ];
        let response = self.request_token(&params).await?;
        Ok(into_token(response, None))
    }

    /// Mints a new access token. Google usually omits the refresh token from
    /// the answer, in which case the current one is kept.
    #[tracing::instrument(name = "Refresh access token", skip(self, credentials, token))]
    pub async fn refresh(
        &self,
        credentials: &ClientCredentials,
        token: &Token,
    ) -> Result<Token, OAuthError> {
        let refresh_token = token
            .refresh_token
            .as_ref()
            .ok_or(OAuthError::MissingRefreshToken)?;
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret().as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
        ];
        let response = self.request_token(&params).await?;
        Ok(into_token(response, Some(refresh_token.clone())))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, OAuthError> {
        let response = self
            .http_client
            .post(&self.token_endpoint)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(error) => match error.error_description {
                    Some(description) => format!("{} ({})", error.error, description),
                    None => error.error,
                },
                Err(_) => body,
            };
            tracing::error!(status = status.as_u16(), %message, "Token request rejected");
            return Err(OAuthError::Rejected { status, message });
        }

        Ok(response.json().await?)
    }
}

fn into_token(response: TokenResponse, previous_refresh_token: Option<Secret<String>>) -> Token {
    let expiry_date = response
        .expires_in
        .map(|seconds| {
            chrono::Utc::now()
                .timestamp_millis()
                .saturating_add(seconds.saturating_mul(1000))
        });
    Token {
        access_token: Secret::new(response.access_token),
        refresh_token: response
            .refresh_token
            .map(Secret::new)
            .or(previous_refresh_token),
        scope: response.scope,
        token_type: response.token_type,
        expiry_date,
    }
}
