use crate::domain::{FormSubmission, Mailbox};
use crate::encoding;

const CONTACT_FORM_SUBJECT: &str = "Contact Form Submitted!";
const NOTIFICATION_SUBJECT: &str = "You've received a message! ✉️";

/// How a submission is laid out in the relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Plain text with a one-line preamble naming the submitter.
    ContactForm,
    /// HTML body holding the submitted message verbatim, with a UTF-8 subject.
    HtmlNotification,
}

/// A fully composed message, ready to be handed to Gmail as `raw`.
#[derive(Debug)]
pub struct OutgoingMessage {
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl OutgoingMessage {
    pub fn compose(
        format: MessageFormat,
        sender: &Mailbox,
        recipient: &Mailbox,
        submission: &FormSubmission,
    ) -> Result<OutgoingMessage, String> {
        let reply_to = submission.submitter()?;
        let message = match format {
            MessageFormat::ContactForm => Self {
                headers: vec![
                    ("From", sender.to_string()),
                    ("Reply-To", reply_to.to_string()),
                    ("To", recipient.to_string()),
                    ("Subject", CONTACT_FORM_SUBJECT.to_string()),
                ],
                body: format!(
                    "{} ({}) sent you a message:\r\n\r\n{}",
                    submission.full_name(),
                    submission.email(),
                    submission.message()
                ),
            },
            MessageFormat::HtmlNotification => Self {
                headers: vec![
                    ("From", sender.to_string()),
                    ("To", recipient.to_string()),
                    ("Reply-To", reply_to.to_string()),
                    ("Content-Type", "text/html; charset=utf-8".to_string()),
                    ("MIME-Version", "1.0".to_string()),
                    ("Subject", encoded_word(NOTIFICATION_SUBJECT)),
                ],
                body: submission.message().to_string(),
            },
        };
        Ok(message)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Header lines, a blank line, then the body.
    pub fn to_mime(&self) -> String {
        let mut mime = String::new();
        for (name, value) in &self.headers {
            mime.push_str(name);
            mime.push_str(": ");
            mime.push_str(value);
            mime.push_str("\r\n");
        }
        mime.push_str("\r\n");
        mime.push_str(&self.body);
        mime
    }

    pub fn to_base64url(&self) -> String {
        encoding::encode(self.to_mime())
    }
}

// RFC 2047 "B" encoding so non-ASCII subjects survive header transport.
fn encoded_word(text: &str) -> String {
    format!("=?utf-8?B?{}?=", base64::encode(text))
}
