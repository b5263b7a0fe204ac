use anyhow::anyhow;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use tracing::{debug, info, trace};

mod events;
pub use events::*;

mod signing;
use signing::SignedGitHubPayload;

use crate::{notify, webhooks::NotifierHandle};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";
const X_GITHUB_DELIVERY: &str = "X-GitHub-Delivery";

pub struct GitHubSecret(pub String);

#[rocket::post("/events", data = "<payload>")]
pub fn github_webhook(
    event_type: GitHubEventType,
    payload: SignedGitHubPayload,
    notifier: &State<NotifierHandle>,
) -> Result<(), Status> {
    let event = decode(&event_type, &payload.0).map_err(|e| {
        debug!("rejecting payload: {}", e);
        Status::BadRequest
    })?;

    match event {
        GitHubEvent::PullRequest(event) => {
            notify::dispatch(notifier.0.as_ref(), &event);
        }
        GitHubEvent::Ping(ping) => info!(
            "received ping for hook {:?} on {:?}: {}",
            ping.hook_id,
            ping.repository.map(|repo| repo.full_name()),
            ping.zen
        ),
        GitHubEvent::Other(name) => debug!("ignoring `{}` event", name),
    }

    Ok(())
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        if event_types.len() != 1 {
            trace!("couldn't locate {} header", X_GITHUB_EVENT);
            return Outcome::Error((
                Status::BadRequest,
                anyhow!("request header needs exactly one event type"),
            ));
        }

        let event_type = GitHubEventType::from(event_types[0]);
        debug!(
            "received `{}` event (delivery {})",
            event_type,
            request.headers().get_one(X_GITHUB_DELIVERY).unwrap_or("unknown")
        );

        Outcome::Success(event_type)
    }
}
