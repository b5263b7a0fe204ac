use tracing::{info, trace};

use crate::webhooks::github::PullRequestEvent;

pub mod comment;
pub mod email;
pub mod github;
pub mod smtp;

pub use comment::{CommentClient, CommentNotifier, CommentRequest};
pub use email::{EmailNotifier, MailDefaults, MailRequest, MailTransport};

/// Body of every notification we send.
pub const PUSH_MESSAGE: &str = "Pull request updated with a push";

/// Something that tells people a pull request was pushed to.
///
/// Implementations hand their request over to a transport and return right away: the outcome
/// of the delivery is never reported back.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &PullRequestEvent);
}

/// Only pushes to a pull request that is still open are worth a notification.
pub fn should_notify(event: &PullRequestEvent) -> bool {
    event.action == "synchronize" && event.pull_request.state == "open"
}

/// Runs `notifier` for `event` if it passes [`should_notify`], and returns whether it did.
pub fn dispatch(notifier: &dyn Notifier, event: &PullRequestEvent) -> bool {
    if !should_notify(event) {
        trace!(
            "ignoring `{}` action on {} pull request #{}",
            event.action,
            event.pull_request.state,
            event.number
        );
        return false;
    }

    info!(
        "pull request {}#{} was pushed to, notifying",
        event.repository.full_name(),
        event.number
    );
    notifier.notify(event);
    true
}
