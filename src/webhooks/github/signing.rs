use std::io;

use anyhow::anyhow;
use hmac::{Hmac, Mac};
use rocket::{
    data::{ByteUnit, FromData, Outcome},
    http::Status,
    Data, Request,
};
use sha1::Sha1;
use tracing::trace;

use crate::webhooks::github::GitHubSecret;

const X_GITHUB_SIGNATURE: &str = "X-Hub-Signature";

type HmacSha1 = Hmac<Sha1>;

pub(crate) fn validate_signature(secret: &str, signature: &str, data: &[u8]) -> bool {
    trace!("validating signature...");

    // any key length is accepted by HMAC
    let mut mac = match HmacSha1::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };

    mac.update(data);

    // GitHub puts a prefix in front of its hex SHA1
    let signature = match signature.strip_prefix("sha1=") {
        Some(s) => s,
        None => {
            trace!("couldn't strip prefix from signature `{}`", signature);
            return false;
        }
    };

    match hex::decode(signature) {
        Ok(bytes) => mac.verify_slice(&bytes).is_ok(),
        Err(_) => {
            trace!("couldn't decode hex-encoded signature {}", signature);
            false
        }
    }
}

/// Raw request body whose `X-Hub-Signature` matched the configured secret.
pub struct SignedGitHubPayload(pub Vec<u8>);

const LIMIT: ByteUnit = ByteUnit::Mebibyte(1);

#[rocket::async_trait]
impl<'r> FromData<'r> for SignedGitHubPayload {
    type Error = anyhow::Error;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        trace!("received payload on GitHub webhook endpoint: {:?}", request);

        let signatures = request
            .headers()
            .get(X_GITHUB_SIGNATURE)
            .collect::<Vec<_>>();
        if signatures.len() != 1 {
            trace!("couldn't locate {} header", X_GITHUB_SIGNATURE);
            return Outcome::Error((
                Status::BadRequest,
                anyhow!("request header needs exactly one signature"),
            ));
        }

        let size_limit = request.limits().get("json").unwrap_or(LIMIT);
        let content = match data.open(size_limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => {
                let eof = io::ErrorKind::UnexpectedEof;
                trace!("payload was too big");
                return Outcome::Error((
                    Status::PayloadTooLarge,
                    io::Error::new(eof, "data limit exceeded").into(),
                ));
            }
            Err(e) => return Outcome::Error((Status::BadRequest, e.into())),
        };

        let signature = signatures[0];
        let secret = match request.rocket().state::<GitHubSecret>() {
            Some(secret) => secret,
            None => {
                return Outcome::Error((
                    Status::InternalServerError,
                    anyhow!("GitHub secret isn't managed by rocket"),
                ))
            }
        };

        if !validate_signature(&secret.0, signature, &content) {
            trace!("signature validation failed, stopping here...");
            return Outcome::Error((Status::BadRequest, anyhow!("couldn't verify signature")));
        }

        trace!("validated GitHub payload");
        Outcome::Success(SignedGitHubPayload(content))
    }
}

/// Computes the `X-Hub-Signature` header value GitHub would send for `data`.
#[cfg(test)]
pub(crate) fn sign(secret: &str, data: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(data);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}
