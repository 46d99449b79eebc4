use std::fmt::Formatter;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::authorization::Authorizer;
use crate::domain::{FormSubmission, MessageFormat};
use crate::gmail_client::GmailClient;
use crate::routes::{relay_submission, RelayError};
use crate::utils::error_chain_fmt;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    message_body: Option<String>,
}

impl TryFrom<MessageData> for FormSubmission {
    type Error = String;

    fn try_from(value: MessageData) -> Result<Self, Self::Error> {
        FormSubmission::parse(
            value.first_name,
            value.last_name,
            value.email,
            value.message_body,
        )
    }
}

#[derive(thiserror::Error)]
pub enum SendMailError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to relay the message")]
    RelayError(#[from] RelayError),
}

impl std::fmt::Debug for SendMailError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendMailError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendMailError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SendMailError::RelayError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
    }
}

#[tracing::instrument(name = "Relaying a JSON message", skip(body, authorizer, gmail_client))]
pub async fn send_mail(
    body: web::Json<MessageData>,
    authorizer: web::Data<Authorizer>,
    gmail_client: web::Data<GmailClient>,
) -> Result<HttpResponse, SendMailError> {
    let submission: FormSubmission = body.0.try_into().map_err(|e: String| {
        tracing::warn!(error = %e, "Rejecting incomplete message");
        SendMailError::ValidationError(e)
    })?;
    relay_submission(
        &authorizer,
        &gmail_client,
        &submission,
        MessageFormat::HtmlNotification,
    )
    .await?;
    Ok(HttpResponse::Ok().finish())
}

/// `/sendMail` only answers POST; anything else is treated as a failure.
pub async fn unsupported_method() -> HttpResponse {
    HttpResponse::InternalServerError().finish()
}
