use std::fmt::Formatter;

use crate::authorization::{AuthorizeError, Authorizer};
use crate::domain::{FormSubmission, MessageFormat};
use crate::gmail_client::{GmailClient, SendError};
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    AuthorizeError(#[from] AuthorizeError),
    #[error(transparent)]
    SendError(#[from] SendError),
}

impl std::fmt::Debug for RelayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Authorize, compose, send. One attempt, nothing retried.
#[tracing::instrument(
    name = "Relaying a form submission",
    skip(authorizer, gmail_client, submission),
    fields(
        submitter_email = %submission.email(),
        submitter_name = %submission.full_name()
    )
)]
pub async fn relay_submission(
    authorizer: &Authorizer,
    gmail_client: &GmailClient,
    submission: &FormSubmission,
    format: MessageFormat,
) -> Result<(), RelayError> {
    let client = authorizer.authorize().await?;
    let message = gmail_client.compose(format, submission)?;
    gmail_client.send_mail(&client, &message).await?;
    Ok(())
}
