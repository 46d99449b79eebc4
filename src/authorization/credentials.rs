use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};
use serde_aux::field_attributes::deserialize_option_number_from_string;

/// Redirect URI for installed applications that have none on record.
pub const OUT_OF_BAND_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// OAuth client registration, as downloaded from the Google Cloud console.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(alias = "web")]
    installed: ClientCredentials,
}

impl ClientCredentials {
    /// Parse a `{"installed": {...}}` (or `{"web": {...}}`) document.
    pub fn parse(json: &str) -> Result<ClientCredentials, serde_json::Error> {
        serde_json::from_str::<CredentialsFile>(json).map(|file| file.installed)
    }

    pub fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(OUT_OF_BAND_REDIRECT_URI)
    }

    /// Hosted configuration cannot hold arrays, so `redirect_uris` is left out.
    pub fn to_env_value(&self) -> String {
        serde_json::json!({
            "installed": {
                "client_id": self.client_id,
                "client_secret": self.client_secret.expose_secret(),
            }
        })
        .to_string()
    }
}

/// Access/refresh token pair minted by the authorization code exchange.
///
/// `expiry_date` is in milliseconds since the Unix epoch. It is informative
/// only: whether a token is still good is up to the Gmail API.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Token {
    #[serde(serialize_with = "expose")]
    pub access_token: Secret<String>,
    #[serde(
        default,
        serialize_with = "expose_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token: Option<Secret<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_option_number_from_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<i64>,
}

impl Token {
    pub fn parse(json: &str) -> Result<Token, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Same as [`Token::to_json`], but with `expiry_date` as a string, since
    /// hosted configuration only stores string values.
    pub fn to_env_value(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(expiry_date) = self.expiry_date {
            value["expiry_date"] = serde_json::Value::String(expiry_date.to_string());
        }
        serde_json::to_string(&value)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_date
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}

fn expose<S: Serializer>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn expose_optional<S: Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Credentials plus a token: what a request to the Gmail API is signed with.
#[derive(Clone, Debug)]
pub struct AuthorizedClient {
    credentials: ClientCredentials,
    token: Token,
}

impl AuthorizedClient {
    pub fn new(credentials: ClientCredentials, token: Token) -> Self {
        Self { credentials, token }
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn access_token(&self) -> &Secret<String> {
        &self.token.access_token
    }
}
