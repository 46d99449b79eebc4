mod form_submission;
mod mailbox;
mod outgoing_message;

pub use form_submission::FormSubmission;
pub use mailbox::Mailbox;
pub use outgoing_message::{MessageFormat, OutgoingMessage};
