use crate::domain::PersonName;

/// A user registration that passed input validation.
///
/// The email is kept as plain text: user emails are deduplicated, not
/// syntax-checked.
pub struct NewUser {
    pub name: PersonName,
    pub email: String,
}
