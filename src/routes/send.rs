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
pub struct FormData {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

impl TryFrom<FormData> for FormSubmission {
    type Error = String;

    fn try_from(value: FormData) -> Result<Self, Self::Error> {
        FormSubmission::parse(value.first_name, value.last_name, value.email, value.message)
    }
}

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to relay the contact form")]
    RelayError(#[from] RelayError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

// The form only ever learns whether it worked.
impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::RelayError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
    }
}

#[tracing::instrument(name = "Relaying a contact form", skip(form, authorizer, gmail_client))]
pub async fn send(
    form: web::Form<FormData>,
    authorizer: web::Data<Authorizer>,
    gmail_client: web::Data<GmailClient>,
) -> Result<HttpResponse, ContactError> {
    let submission: FormSubmission = form.0.try_into().map_err(|e: String| {
        tracing::error!(error = %e, "Not all fields are defined in POST request");
        ContactError::ValidationError(e)
    })?;
    relay_submission(&authorizer, &gmail_client, &submission, MessageFormat::ContactForm).await?;
    Ok(HttpResponse::Ok().finish())
}
