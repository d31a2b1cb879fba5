//! Sending mail over SMTP with lettre.

use crate::error::Result;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// A plain-text message, one sender, any number of recipients.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    fn build(&self) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.parse::<Mailbox>()?)
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.to {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        Ok(builder.body(self.body.clone())?)
    }
}

/// Sends through an unencrypted transport, e.g. a relay on localhost.
pub fn send_plaintext(host: &str, port: u16, mail: &OutgoingMail) -> Result<()> {
    let message = mail.build()?;
    let mailer = SmtpTransport::builder_dangerous(host).port(port).build();
    mailer.send(&message)?;
    tracing::debug!(host, port, "message accepted by relay");
    Ok(())
}

/// Sends through a STARTTLS relay with username/password authentication.
pub fn send_authenticated(
    host: &str,
    username: &str,
    password: &str,
    mail: &OutgoingMail,
) -> Result<()> {
    let message = mail.build()?;
    let mailer = SmtpTransport::starttls_relay(host)?
        .credentials(Credentials::new(username.to_owned(), password.to_owned()))
        .build();
    mailer.send(&message)?;
    Ok(())
}
