use serde::{de::IgnoredAny, Deserialize};
use thiserror::Error;

mod ping;
mod pull_request;

pub use ping::*;
pub use pull_request::*;

#[derive(Debug)]
pub enum GitHubEvent {
    Ping(PingEvent),
    PullRequest(PullRequestEvent),
    /// Any event type we don't act on, with the name GitHub sent.
    Other(String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed `{event_type}` payload: {source}")]
    Json {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes a verified webhook body according to its `X-GitHub-Event` type.
///
/// Event types other than `pull_request` and `ping` only need to be valid JSON documents.
pub fn decode(event_type: &GitHubEventType, body: &[u8]) -> Result<GitHubEvent, DecodeError> {
    let json_error = |source: serde_json::Error| DecodeError::Json {
        event_type: event_type.to_string(),
        source,
    };

    let event = match event_type {
        GitHubEventType::Ping => {
            GitHubEvent::Ping(serde_json::from_slice(body).map_err(json_error)?)
        }
        GitHubEventType::PullRequest => {
            GitHubEvent::PullRequest(serde_json::from_slice(body).map_err(json_error)?)
        }
        GitHubEventType::Other(name) => {
            serde_json::from_slice::<IgnoredAny>(body).map_err(json_error)?;
            GitHubEvent::Other(name.clone())
        }
    };

    Ok(event)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubEventType {
    Ping,
    PullRequest,
    Other(String),
}

impl From<&str> for GitHubEventType {
    fn from(name: &str) -> Self {
        match name {
            "ping" => Self::Ping,
            "pull_request" => Self::PullRequest,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for GitHubEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ping => write!(f, "ping"),
            Self::PullRequest => write!(f, "pull_request"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// A repository as found in webhook payloads.
///
/// GitHub always sends both `full_name` and `owner`/`name`, but only one of the two forms is
/// required here: the other one is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RepositoryPayload")]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// The `owner/name` form of the repository.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Deserialize)]
struct RepositoryPayload {
    full_name: Option<String>,
    name: Option<String>,
    owner: Option<GitHubUser>,
}

impl TryFrom<RepositoryPayload> for Repository {
    type Error = String;

    fn try_from(payload: RepositoryPayload) -> Result<Self, Self::Error> {
        if let (Some(owner), Some(name)) = (payload.owner, payload.name) {
            return Ok(Self {
                owner: owner.login,
                name,
            });
        }

        let full_name = payload
            .full_name
            .ok_or("repository needs either `full_name` or `owner` and `name`")?;
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_owned(),
                name: name.to_owned(),
            }),
            _ => Err(format!("invalid repository full name `{}`", full_name)),
        }
    }
}
