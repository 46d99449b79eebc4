use std::fmt;

/// A display name plus an address, rendered as `Name <address>` in header lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    name: String,
    address: String,
}

impl Mailbox {
    pub fn parse(name: String, address: String) -> Result<Mailbox, String> {
        let name = name.trim().to_string();
        let address = address.trim().to_string();

        if address.is_empty() {
            return Err("A mailbox needs an address".into());
        }
        if contains_line_break(&name) || contains_line_break(&address) {
            return Err(format!("{} <{}> is not a valid mailbox", name, address));
        }
        Ok(Self { name, address })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<{}>", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

pub(crate) fn contains_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}
