use std::sync::Arc;

use rocket::{catchers, routes, Build, Rocket};

use crate::notify::Notifier;

pub mod github;
use github::{github_webhook, GitHubSecret};

pub struct NotifierHandle(pub Arc<dyn Notifier>);

/// Mounts the webhook endpoint on `rocket`, with the state it needs.
pub fn mount(rocket: Rocket<Build>, github_secret: String, notifier: Arc<dyn Notifier>) -> Rocket<Build> {
    rocket
        .mount("/", routes![github_webhook])
        .register("/", catchers![bad_request, not_found, payload_too_large])
        .manage(GitHubSecret(github_secret))
        .manage(NotifierHandle(notifier))
}

#[rocket::catch(400)]
fn bad_request() -> &'static str {
    "Bad Request"
}

#[rocket::catch(404)]
fn not_found() -> &'static str {
    "Not Found"
}

#[rocket::catch(413)]
fn payload_too_large() -> &'static str {
    "Payload Too Large"
}
