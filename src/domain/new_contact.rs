use crate::domain::{EmailAddress, PersonName};

/// A contact-form submission that passed input validation.
pub struct NewContact {
    pub name: PersonName,
    pub email: EmailAddress,
    pub role: Option<String>,
    pub message: Option<String>,
}
