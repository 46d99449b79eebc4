mod authorizer;
mod credentials;
mod oauth;
mod prompt;
mod store;

pub use authorizer::{AuthorizeError, Authorizer};
pub use credentials::{AuthorizedClient, ClientCredentials, Token};
pub use oauth::{OAuthClient, OAuthError, GMAIL_SEND_SCOPE};
pub use prompt::{CodePrompt, EnvPrompt, TerminalPrompt, UnattendedPrompt};
pub use store::{CredentialStore, EnvStore, FileStore, StoreError};
