use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

use crate::{
    config::{SmtpConfig, SmtpSecurity},
    notify::{MailRequest, MailTransport},
};

/// Sends mails through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .with_context(|| format!("couldn't set up TLS relay {}", config.host))?,
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .with_context(|| format!("couldn't set up STARTTLS relay {}", config.host))?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn build_message(mail: MailRequest) -> anyhow::Result<Message> {
    let mut builder = Message::builder()
        .from(mail.from.parse::<Mailbox>().context("invalid sender")?)
        .subject(mail.subject)
        .in_reply_to(mail.in_reply_to)
        .references(mail.references)
        .header(ContentType::TEXT_PLAIN);

    for to in &mail.to {
        builder = builder.to(to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient `{}`", to))?);
    }

    builder.body(mail.body).context("couldn't build mail")
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: MailRequest) {
        let message = match build_message(mail) {
            Ok(message) => message,
            Err(e) => {
                warn!("not sending mail: {:#}", e);
                return;
            }
        };

        let transport = self.transport.clone();
        tokio::spawn(async move {
            match transport.send(message).await {
                Ok(response) => debug!("mail accepted by relay with code {}", response.code()),
                Err(e) => warn!("couldn't send mail: {}", e),
            }
        });
    }
}
