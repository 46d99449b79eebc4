use crate::domain::mailbox::contains_line_break;
use crate::domain::Mailbox;

/// A contact-form submission whose four fields are all present and non-blank.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    first_name: String,
    last_name: String,
    email: String,
    message: String,
}

impl FormSubmission {
    pub fn parse(
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<FormSubmission, String> {
        let first_name = header_field("first name", first_name)?;
        let last_name = header_field("last name", last_name)?;
        let email = header_field("email", email)?;
        let message = required_field("message", message)?;

        Ok(Self {
            first_name,
            last_name,
            email,
            message,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Where replies to the relayed message should go.
    pub fn submitter(&self) -> Result<Mailbox, String> {
        Mailbox::parse(self.full_name(), self.email.clone())
    }
}

fn required_field(name: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("The {} field is missing", name)),
    }
}

// Values that end up in a header line are trimmed and must stay on one line.
fn header_field(name: &str, value: Option<String>) -> Result<String, String> {
    let value = required_field(name, value)?;
    if contains_line_break(&value) {
        return Err(format!("The {} field must fit on a single line", name));
    }
    Ok(value.trim().to_string())
}
