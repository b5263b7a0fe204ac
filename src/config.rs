use std::net::{IpAddr, Ipv4Addr};

use anyhow::Context;
use lettre::message::Mailbox;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct NotifierConfig {
    /// Secret shared with GitHub, used to sign webhook payloads
    pub github_secret: String,
    /// Address the HTTP server listens on
    #[serde(default = "default_address")]
    pub address: IpAddr,
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// How pushes to pull requests are announced
    pub notifier: NotifierKind,
}

fn default_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifierKind {
    /// Reply by mail to GitHub's notification thread for the pull request
    Email {
        from: String,
        to: Vec<String>,
        smtp: SmtpConfig,
    },
    /// Comment on the pull request
    Comment {
        github_token: String,
        /// Base URL of the API, for GitHub Enterprise instances
        github_api_url: Option<Url>,
    },
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    /// Defaults to the standard port for the selected security
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub security: SmtpSecurity,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS, usually on port 465
    Tls,
    #[default]
    Starttls,
    /// Plain text, only for relays on a trusted network
    None,
}

impl NotifierConfig {
    pub fn from_yaml(reader: impl std::io::Read) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_reader(reader).context("couldn't parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let NotifierKind::Email { from, to, .. } = &self.notifier {
            from.parse::<Mailbox>()
                .with_context(|| format!("invalid sender address `{}`", from))?;

            if to.is_empty() {
                anyhow::bail!("at least one recipient is needed");
            }
            for address in to {
                address
                    .parse::<Mailbox>()
                    .with_context(|| format!("invalid recipient address `{}`", address))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_email_config() {
        let config = NotifierConfig::from_yaml(
            r#"
github_secret: secret
port: 7878
notifier:
  kind: email
  from: noreply@example.com
  to:
    - johndoe@example.com
  smtp:
    host: smtp.example.com
    username: notifier
    password: hunter2
"#
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(config.github_secret, "secret");
        assert_eq!(config.port, 7878);
        assert_eq!(config.address, default_address());
        match config.notifier {
            NotifierKind::Email { from, to, smtp } => {
                assert_eq!(from, "noreply@example.com");
                assert_eq!(to, vec!["johndoe@example.com"]);
                assert_eq!(smtp.host, "smtp.example.com");
                assert_eq!(smtp.port, None);
                assert_eq!(smtp.security, SmtpSecurity::Starttls);
            }
            other => panic!("unexpected notifier {:?}", other),
        }
    }

    #[test]
    fn parse_comment_config() {
        let config = NotifierConfig::from_yaml(
            r#"
github_secret: secret
address: 0.0.0.0
notifier:
  kind: comment
  github_token: ghp_token
  github_api_url: https://github.example.com/api/v3/
"#
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        match config.notifier {
            NotifierKind::Comment {
                github_token,
                github_api_url,
            } => {
                assert_eq!(github_token, "ghp_token");
                assert_eq!(
                    github_api_url.unwrap().as_str(),
                    "https://github.example.com/api/v3/"
                );
            }
            other => panic!("unexpected notifier {:?}", other),
        }
    }

    #[test]
    fn reject_bad_addresses() {
        let config = |from: &str, to: &str| {
            format!(
                "github_secret: secret\nnotifier:\n  kind: email\n  from: \"{}\"\n  to: [{}]\n  smtp:\n    host: localhost\n    security: none\n",
                from, to
            )
        };

        assert!(NotifierConfig::from_yaml(config("noreply@example.com", "a@example.com").as_bytes()).is_ok());
        assert!(NotifierConfig::from_yaml(config("nope", "a@example.com").as_bytes()).is_err());
        assert!(NotifierConfig::from_yaml(config("noreply@example.com", "").as_bytes()).is_err());
        assert!(NotifierConfig::from_yaml(config("noreply@example.com", "\"not valid\"").as_bytes()).is_err());
    }

    #[test]
    fn secret_is_required() {
        let yaml = "notifier:\n  kind: comment\n  github_token: token\n";
        assert!(NotifierConfig::from_yaml(yaml.as_bytes()).is_err());
    }
}
