use anyhow::Context;
use octocrab::Octocrab;
use tracing::{debug, warn};
use url::Url;

use crate::notify::{CommentClient, CommentRequest};

/// Posts comments through the GitHub REST API.
pub struct GitHubCommenter {
    client: Octocrab,
}

impl GitHubCommenter {
    /// Authenticates with a personal access token, against `api_url` for GitHub Enterprise
    /// instances or against github.com otherwise.
    pub fn new(token: &str, api_url: Option<&Url>) -> anyhow::Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_owned());
        if let Some(api_url) = api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .with_context(|| format!("invalid GitHub API URL {}", api_url))?;
        }

        let client = builder.build().context("couldn't build GitHub client")?;
        Ok(Self { client })
    }
}

impl CommentClient for GitHubCommenter {
    fn create_comment(&self, comment: CommentRequest) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let CommentRequest {
                owner,
                repo,
                issue_number,
                body,
            } = comment;

            match client
                .issues(&owner, &repo)
                .create_comment(issue_number, body)
                .await
            {
                Ok(posted) => debug!("posted comment {}", posted.html_url),
                Err(e) => warn!(
                    "couldn't comment on {}/{}#{}: {}",
                    owner, repo, issue_number, e
                ),
            }
        });
    }
}
