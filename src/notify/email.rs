use std::sync::Arc;

use tracing::debug;

use crate::{
    notify::{Notifier, PUSH_MESSAGE},
    webhooks::github::PullRequestEvent,
};

/// Everything needed to send one mail, independently of how it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub in_reply_to: String,
    pub references: String,
}

pub trait MailTransport: Send + Sync {
    /// Hands `mail` over for delivery, without waiting for it to be delivered.
    fn send(&self, mail: MailRequest);
}

/// Sender and recipients of every mail.
#[derive(Debug, Clone)]
pub struct MailDefaults {
    pub from: String,
    pub to: Vec<String>,
}

/// Replies to the GitHub notification mail thread of the pull request.
pub struct EmailNotifier {
    defaults: MailDefaults,
    transport: Arc<dyn MailTransport>,
}

impl EmailNotifier {
    pub fn new(defaults: MailDefaults, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            defaults,
            transport,
        }
    }

    pub fn build(&self, event: &PullRequestEvent) -> MailRequest {
        let repo_name = event.repository.full_name();
        // GitHub uses this as the Message-ID of the first notification about a pull request, so
        // mail clients put our reply in the same thread
        let thread_id = format!("<{}/pull/{}@github.com>", repo_name, event.number);

        MailRequest {
            from: self.defaults.from.clone(),
            to: self.defaults.to.clone(),
            subject: format!(
                "Re: [{}] {} (#{})",
                repo_name,
                event.pull_request.title.as_deref().unwrap_or_default(),
                event.number
            ),
            body: PUSH_MESSAGE.to_owned(),
            in_reply_to: thread_id.clone(),
            references: thread_id,
        }
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, event: &PullRequestEvent) {
        let mail = self.build(event);
        debug!("sending mail `{}` to {:?}", mail.subject, mail.to);
        self.transport.send(mail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::{pull_request_event, RecordingMailer};

    fn defaults() -> MailDefaults {
        MailDefaults {
            from: "noreply@example.com".to_owned(),
            to: vec!["johndoe@example.com".to_owned()],
        }
    }

    #[test]
    fn builds_threaded_reply() {
        let notifier = EmailNotifier::new(defaults(), Arc::new(RecordingMailer::default()));

        let mail = notifier.build(&pull_request_event("synchronize", "open"));

        assert_eq!(
            mail,
            MailRequest {
                from: "noreply@example.com".to_owned(),
                to: vec!["johndoe@example.com".to_owned()],
                subject: "Re: [acme/widget] Test Title (#12)".to_owned(),
                body: "Pull request updated with a push".to_owned(),
                in_reply_to: "<acme/widget/pull/12@github.com>".to_owned(),
                references: "<acme/widget/pull/12@github.com>".to_owned(),
            }
        );
    }

    #[test]
    fn untitled_pull_request_still_gets_a_subject() {
        let notifier = EmailNotifier::new(defaults(), Arc::new(RecordingMailer::default()));
        let mut event = pull_request_event("synchronize", "open");
        event.pull_request.title = None;

        let mail = notifier.build(&event);

        assert_eq!(mail.subject, "Re: [acme/widget]  (#12)");
        assert_eq!(mail.in_reply_to, "<acme/widget/pull/12@github.com>");
    }

    #[test]
    fn notify_hands_mail_to_transport() {
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = EmailNotifier::new(defaults(), mailer.clone());
        let event = pull_request_event("synchronize", "open");

        notifier.notify(&event);
        notifier.notify(&event);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], notifier.build(&event));
        assert_eq!(sent[0], sent[1]);
    }
}
