use serde::Deserialize;

use crate::webhooks::github::events::Repository;

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    /// `open` or `closed`
    pub state: String,
    /// Only needed to build mail subjects
    pub title: Option<String>,
}
