use std::path::PathBuf;

use crate::authorization::{ClientCredentials, Token};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Nothing is stored at {0}")]
    Missing(String),
    #[error("Failed to read {location}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse the contents of {location}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write {location}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Where the client registration and the current token live.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load_credentials(&self) -> Result<ClientCredentials, StoreError>;

    /// `Ok(None)` when no token has been stored yet.
    async fn load_token(&self) -> Result<Option<Token>, StoreError>;

    /// Replaces whatever token was stored before.
    async fn save_token(&self, token: &Token) -> Result<(), StoreError>;

    /// Human readable location of the token, for logs and CLI output.
    fn token_location(&self) -> String;

    /// Whether a saved token is still there once this process exits.
    fn outlives_process(&self) -> bool {
        true
    }
}

/// `credentials.json` and `token.json` on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl FileStore {
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileStore {
    #[tracing::instrument(name = "Load client credentials from file", skip(self))]
    async fn load_credentials(&self) -> Result<ClientCredentials, StoreError> {
        let location = self.credentials_path.display().to_string();
        let contents = tokio::fs::read_to_string(&self.credentials_path)
            .await
            .map_err(|source| StoreError::Read {
                location: location.clone(),
                source,
            })?;
        ClientCredentials::parse(&contents).map_err(|source| StoreError::Parse { location, source })
    }

    #[tracing::instrument(name = "Load token from file", skip(self))]
    async fn load_token(&self) -> Result<Option<Token>, StoreError> {
        let location = self.token_location();
        let contents = match tokio::fs::read_to_string(&self.token_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { location, source }),
        };
        Token::parse(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse { location, source })
    }

    #[tracing::instrument(name = "Save token to file", skip(self, token))]
    async fn save_token(&self, token: &Token) -> Result<(), StoreError> {
        let contents = token
            .to_json()
            .map_err(|e| anyhow::anyhow!(e).context("Failed to serialize the token"))?;
        tokio::fs::write(&self.token_path, contents)
            .await
            .map_err(|source| StoreError::Write {
                location: self.token_location(),
                source,
            })
    }

    fn token_location(&self) -> String {
        self.token_path.display().to_string()
    }
}

/// JSON blobs held in environment variables, for hosted deployments that have
/// no writable disk. Saving only affects the running process.
#[derive(Debug, Clone)]
pub struct EnvStore {
    credentials_var: String,
    token_var: String,
}

impl EnvStore {
    pub fn new(credentials_var: impl Into<String>, token_var: impl Into<String>) -> Self {
        Self {
            credentials_var: credentials_var.into(),
            token_var: token_var.into(),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for EnvStore {
    async fn load_credentials(&self) -> Result<ClientCredentials, StoreError> {
        let contents = std::env::var(&self.credentials_var)
            .map_err(|_| StoreError::Missing(format!("${}", self.credentials_var)))?;
        ClientCredentials::parse(&contents).map_err(|source| StoreError::Parse {
            location: format!("${}", self.credentials_var),
            source,
        })
    }

    async fn load_token(&self) -> Result<Option<Token>, StoreError> {
        let contents = match std::env::var(&self.token_var) {
            Ok(contents) if !contents.trim().is_empty() => contents,
            _ => return Ok(None),
        };
        Token::parse(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                location: self.token_location(),
                source,
            })
    }

    async fn save_token(&self, token: &Token) -> Result<(), StoreError> {
        let contents = token
            .to_env_value()
            .map_err(|e| anyhow::anyhow!(e).context("Failed to serialize the token"))?;
        std::env::set_var(&self.token_var, contents);
        Ok(())
    }

    fn token_location(&self) -> String {
        format!("${}", self.token_var)
    }

    fn outlives_process(&self) -> bool {
        false
    }
}
