use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
use config::{NotifierConfig, NotifierKind};

mod notify;
use notify::{
    github::GitHubCommenter, smtp::SmtpMailer, CommentNotifier, EmailNotifier, MailDefaults,
    Notifier,
};

mod webhooks;

#[derive(Parser)]
#[command(version = "0.1")]
struct Opts {
    /// Configuration file for the notifier
    #[arg(short, long)]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config = NotifierConfig::from_yaml(BufReader::new(config_file))?;

    let notifier: Arc<dyn Notifier> = match &config.notifier {
        NotifierKind::Email { from, to, smtp } => {
            info!("announcing pushes by mail to {:?} through {}", to, smtp.host);
            let mailer = SmtpMailer::new(smtp).context("failed to create SMTP transport")?;
            let defaults = MailDefaults {
                from: from.clone(),
                to: to.clone(),
            };
            Arc::new(EmailNotifier::new(defaults, Arc::new(mailer)))
        }
        NotifierKind::Comment {
            github_token,
            github_api_url,
        } => {
            info!("announcing pushes with pull request comments");
            let commenter = GitHubCommenter::new(github_token, github_api_url.as_ref())
                .context("failed to create GitHub client")?;
            Arc::new(CommentNotifier::new(Arc::new(commenter)))
        }
    };

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));
    let rocket = webhooks::mount(rocket::custom(figment), config.github_secret, notifier);
    rocket
        .launch()
        .await
        .map(|_| ())
        .map_err(|err| anyhow::anyhow!("rocket failed: {}", err))
}
