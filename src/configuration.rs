use std::path::PathBuf;
use std::sync::Arc;

use serde_aux::field_attributes::deserialize_number_from_string;

use crate::authorization::{CredentialStore, EnvStore, FileStore, OAuthClient};
use crate::bootstrap::ExportVars;
use crate::domain::Mailbox;
use crate::gmail_client::GmailClient;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub gmail: GmailSettings,
    pub storage: StorageSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Where `GET /` sends visitors.
    pub site_url: String,
    /// The only origin allowed to post the contact form.
    pub allowed_origin: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct GmailSettings {
    pub api_base_url: String,
    pub authorization_url: String,
    pub token_url: String,
    pub sender: MailboxSettings,
    pub recipient: MailboxSettings,
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct MailboxSettings {
    pub name: String,
    pub email: String,
}

impl MailboxSettings {
    pub fn mailbox(&self) -> Result<Mailbox, String> {
        Mailbox::parse(self.name.clone(), self.email.clone())
    }
}

impl GmailSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<GmailClient, String> {
        Ok(GmailClient::new(
            self.api_base_url.clone(),
            self.sender.mailbox()?,
            self.recipient.mailbox()?,
            self.timeout(),
        ))
    }

    pub fn oauth_client(&self) -> OAuthClient {
        OAuthClient::new(
            self.authorization_url.clone(),
            self.token_url.clone(),
            self.timeout(),
        )
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Environment,
}

#[derive(serde::Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub credentials_var: String,
    pub token_var: String,
}

impl StorageSettings {
    pub fn store(&self) -> Arc<dyn CredentialStore> {
        match self.backend {
            StorageBackend::File => Arc::new(FileStore::new(
                self.credentials_path.clone(),
                self.token_path.clone(),
            )),
            StorageBackend::Environment => Arc::new(EnvStore::new(
                self.credentials_var.clone(),
                self.token_var.clone(),
            )),
        }
    }

    pub fn export_vars(&self) -> ExportVars {
        ExportVars {
            credentials_var: self.credentials_var.clone(),
            token_var: self.token_var.clone(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Read the "default" configuration file
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;

    // Layer on the environment-specific values
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;

    // E.g. `APP_APPLICATION__PORT=5001` would set `Settings.application.port`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    // Hosting platforms hand out the port through `PORT`
    if let Ok(port) = std::env::var("PORT") {
        settings.set("application.port", port)?;
    }

    settings.try_into()
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
