//! Auth delegate location, trusted origins, social providers and the route
//! guard prefix.

use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use url::Url;

use crate::api::{guard::DEFAULT_PROTECTED_PREFIX, types::SocialProvider};

pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_APP_URL: &str = "app-url";
pub const ARG_DEV_ORIGIN: &str = "dev-origin";
pub const ARG_PROTECTED_PREFIX: &str = "protected-prefix";

const fn client_id_arg(provider: SocialProvider) -> &'static str {
    match provider {
        SocialProvider::Google => "google-client-id",
        SocialProvider::Github => "github-client-id",
    }
}

const fn client_secret_arg(provider: SocialProvider) -> &'static str {
    match provider {
        SocialProvider::Google => "google-client-secret",
        SocialProvider::Github => "github-client-secret",
    }
}

const fn client_id_env(provider: SocialProvider) -> &'static str {
    match provider {
        SocialProvider::Google => "GOOGLE_CLIENT_ID",
        SocialProvider::Github => "GITHUB_CLIENT_ID",
    }
}

const fn client_secret_env(provider: SocialProvider) -> &'static str {
    match provider {
        SocialProvider::Google => "GOOGLE_CLIENT_SECRET",
        SocialProvider::Github => "GITHUB_CLIENT_SECRET",
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_delegate_args(command);
    let command = with_social_args(command);
    command.arg(
        Arg::new(ARG_PROTECTED_PREFIX)
            .long(ARG_PROTECTED_PREFIX)
            .help("Path prefix that requires a session; anonymous requests are redirected to /login")
            .env("VESTLY_PROTECTED_PREFIX")
            .default_value(DEFAULT_PROTECTED_PREFIX),
    )
}

fn with_delegate_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help("Base URL of the auth delegate that /api/auth/* is forwarded to")
                .env("VESTLY_AUTH_URL")
                .default_value("http://localhost:3001"),
        )
        .arg(
            Arg::new(ARG_APP_URL)
                .long(ARG_APP_URL)
                .help("Public URL of the app, first trusted origin of the auth delegate")
                .env("VESTLY_APP_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_DEV_ORIGIN)
                .long(ARG_DEV_ORIGIN)
                .help("Local development origin trusted by the auth delegate")
                .env("VESTLY_DEV_ORIGIN")
                .default_value("http://localhost:3001"),
        )
}

fn with_social_args(command: Command) -> Command {
    SocialProvider::ALL
        .into_iter()
        .fold(command, |command, provider| {
            let id = client_id_arg(provider);
            let secret = client_secret_arg(provider);
            command
                .arg(
                    Arg::new(id)
                        .long(id)
                        .help(format!("{} OAuth client id", provider.label()))
                        .env(client_id_env(provider))
                        .requires(secret),
                )
                .arg(
                    Arg::new(secret)
                        .long(secret)
                        .help(format!("{} OAuth client secret", provider.label()))
                        .env(client_secret_env(provider))
                        .hide_env_values(true)
                        .requires(id),
                )
        })
}

#[derive(Debug, Clone)]
pub struct Options {
    pub auth_url: Url,
    pub app_url: Url,
    pub dev_origin: Url,
    /// Providers with a complete id and secret pair. The values themselves
    /// belong to the auth delegate and are not kept.
    pub social_providers: Vec<SocialProvider>,
    pub protected_prefix: String,
}

impl Options {
    /// # Errors
    /// Returns an error if a URL is invalid or a provider is half configured.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let social_providers = SocialProvider::ALL
            .into_iter()
            .filter_map(|provider| social_provider(matches, provider).transpose())
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            auth_url: url_arg(matches, ARG_AUTH_URL)?,
            app_url: url_arg(matches, ARG_APP_URL)?,
            dev_origin: url_arg(matches, ARG_DEV_ORIGIN)?,
            social_providers,
            protected_prefix: matches
                .get_one::<String>(ARG_PROTECTED_PREFIX)
                .cloned()
                .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIX.to_string()),
        })
    }

    /// Origins the auth delegate accepts requests from, app URL first.
    #[must_use]
    pub fn trusted_origins(&self) -> Vec<String> {
        let mut origins = vec![self.app_url.origin().ascii_serialization()];
        let dev = self.dev_origin.origin().ascii_serialization();
        if !origins.contains(&dev) {
            origins.push(dev);
        }
        origins
    }
}

fn url_arg(matches: &ArgMatches, name: &str) -> Result<Url> {
    let raw = matches
        .get_one::<String>(name)
        .with_context(|| format!("missing required argument: --{name}"))?;
    let url = Url::parse(raw).with_context(|| format!("Invalid --{name}: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("--{name} must be an http(s) URL: {raw}"));
    }
    Ok(url)
}

fn social_provider(
    matches: &ArgMatches,
    provider: SocialProvider,
) -> Result<Option<SocialProvider>> {
    let id = matches.contains_id(client_id_arg(provider));
    let secret = matches.contains_id(client_secret_arg(provider));

    match (id, secret) {
        (true, true) => Ok(Some(provider)),
        (false, false) => Ok(None),
        _ => Err(anyhow!(
            "--{} and --{} must be set together",
            client_id_arg(provider),
            client_secret_arg(provider)
        )),
    }
}
