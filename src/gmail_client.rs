use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;

use crate::authorization::AuthorizedClient;
use crate::domain::{FormSubmission, Mailbox, MessageFormat, OutgoingMessage};

const SENT_LABEL: &str = "SENT";

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("Gmail refused the message with status {0}")]
    Rejected(StatusCode),
    #[error("Gmail answered without labelling the message as SENT")]
    NotSent,
    #[error("Failed to compose the message: {0}")]
    Composition(String),
    #[error("Failed to talk to Gmail")]
    Transport(#[from] reqwest::Error),
}

pub struct GmailClient {
    http_client: Client,
    base_url: String,
    sender: Mailbox,
    recipient: Mailbox,
}

#[derive(serde::Serialize)]
struct SendMessageRequest<'a> {
    raw: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentMessage {
    id: Option<String>,
    #[serde(default)]
    label_ids: Vec<String>,
}

impl GmailClient {
    pub fn new(base_url: String, sender: Mailbox, recipient: Mailbox, timeout: Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
            sender,
            recipient,
        }
    }

    pub fn compose(
        &self,
        format: MessageFormat,
        submission: &FormSubmission,
    ) -> Result<OutgoingMessage, SendError> {
        OutgoingMessage::compose(format, &self.sender, &self.recipient, submission)
            .map_err(SendError::Composition)
    }

    /// Submits `message` through `users.messages.send` on behalf of `client`.
    ///
    /// Only a 200 whose message carries the SENT label counts as delivered.
    #[tracing::instrument(name = "Send message through Gmail", skip(self, client, message))]
    pub async fn send_mail(
        &self,
        client: &AuthorizedClient,
        message: &OutgoingMessage,
    ) -> Result<(), SendError> {
        let url = format!("{}/gmail/v1/users/me/messages/send", self.base_url);
        let raw = message.to_base64url();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(client.access_token().expose_secret())
            .json(&SendMessageRequest { raw: &raw })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(status = status.as_u16(), "Email not sent");
            return Err(SendError::Rejected(status));
        }

        let sent: SentMessage = response.json().await?;
        if !sent.label_ids.iter().any(|label| label == SENT_LABEL) {
            tracing::error!(
                status = status.as_u16(),
                labels = ?sent.label_ids,
                "Email not sent"
            );
            return Err(SendError::NotSent);
        }

        tracing::info!(message_id = ?sent.id, "Email sent");
        Ok(())
    }
}
