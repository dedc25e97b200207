use thiserror::Error;

pub const DEFAULT_SUBMIT_LABEL: &str = "Send Message";
pub const SENDING_LABEL: &str = "Sending...";
pub const THANK_YOU_NOTICE: &str = "Thank you for your message! I'll get back to you soon.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in all fields.")]
    MissingFields(Vec<&'static str>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A draft that passed validation. There is no delivery endpoint; it only
/// exists long enough to be acknowledged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn validate(&self) -> Result<ContactMessage, ContactError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ContactError::MissingFields(missing));
        }

        Ok(ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
}

impl SubmitPhase {
    pub fn label<'a>(self, idle_label: &'a str) -> &'a str {
        match self {
            Self::Idle => idle_label,
            Self::Sending => SENDING_LABEL,
        }
    }

    pub fn disabled(self) -> bool {
        matches!(self, Self::Sending)
    }
}
