use std::sync::Arc;

use tracing::debug;

use crate::{
    notify::{Notifier, PUSH_MESSAGE},
    webhooks::github::PullRequestEvent,
};

/// A comment to post on an issue or a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub body: String,
}

pub trait CommentClient: Send + Sync {
    /// Hands `comment` over for posting, without waiting for it to be posted.
    fn create_comment(&self, comment: CommentRequest);
}

/// Comments on the pull request itself.
pub struct CommentNotifier {
    client: Arc<dyn CommentClient>,
}

impl CommentNotifier {
    pub fn new(client: Arc<dyn CommentClient>) -> Self {
        Self { client }
    }

    pub fn build(&self, event: &PullRequestEvent) -> CommentRequest {
        CommentRequest {
            owner: event.repository.owner.clone(),
            repo: event.repository.name.clone(),
            issue_number: event.number,
            body: PUSH_MESSAGE.to_owned(),
        }
    }
}

impl Notifier for CommentNotifier {
    fn notify(&self, event: &PullRequestEvent) {
        let comment = self.build(event);
        debug!(
            "commenting on {}/{}#{}",
            comment.owner, comment.repo, comment.issue_number
        );
        self.client.create_comment(comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::{pull_request_event, RecordingCommenter};

    #[test]
    fn comments_on_pull_request() {
        let commenter = Arc::new(RecordingCommenter::default());
        let notifier = CommentNotifier::new(commenter.clone());

        notifier.notify(&pull_request_event("synchronize", "open"));

        assert_eq!(
            commenter.posted(),
            vec![CommentRequest {
                owner: "acme".to_owned(),
                repo: "widget".to_owned(),
                issue_number: 12,
                body: "Pull request updated with a push".to_owned(),
            }]
        );
    }
}
