mod email_address;
mod new_contact;
mod new_user;
mod person_name;

pub use email_address::EmailAddress;
pub use new_contact::NewContact;
pub use new_user::NewUser;
pub use person_name::PersonName;
