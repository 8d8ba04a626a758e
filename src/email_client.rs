use crate::domain::EmailAddress;
use htmlescape::encode_minimal;
use secrecy::{ExposeSecret, Secret};

/// Client for the transactional-email HTTP API used to notify the operator
/// about new contact submissions.
pub struct EmailClient {
    http_client: reqwest::Client,
    base_url: String,
    sender: String,
    api_key: Option<Secret<String>>,
    recipient: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum EmailError {
    #[error("{0} is not configured")]
    Configuration(&'static str),
    #[error("failed to deliver the notification email")]
    Delivery(#[from] reqwest::Error),
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        api_key: Option<Secret<String>>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            sender,
            api_key,
            recipient,
        }
    }

    /// Delivers a formatted notification to the configured operator inbox.
    ///
    /// Credentials and recipient are checked before touching the network so
    /// that a missing configuration never shows up as a transport error.
    #[tracing::instrument(
        name = "Sending a contact notification email",
        skip(self, message)
    )]
    pub async fn send_contact_notification(
        &self,
        name: &str,
        email: &EmailAddress,
        message: Option<&str>,
    ) -> Result<(), EmailError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmailError::Configuration("RESEND_API_KEY"))?;
        let recipient = self
            .recipient
            .as_deref()
            .ok_or(EmailError::Configuration("CONTACT_NOTIFICATION_EMAIL"))?;

        // User-supplied text goes into an HTML body; escape everything.
        let safe_name = encode_minimal(name);
        let safe_email = encode_minimal(email.as_ref());
        let safe_message = match message {
            Some(m) if !m.is_empty() => encode_minimal(m),
            _ => "—".to_owned(),
        };
        let html = format!(
            "<h2>New contact received</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Message:</strong></p>\
             <pre>{}</pre>",
            safe_name, safe_email, safe_message
        );

        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: recipient,
            subject: "New message from the contact form",
            html: &html,
        };
        self.http_client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
