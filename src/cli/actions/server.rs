use crate::{
    api::{self, PageSettings, delegate::AuthDelegate, guard::ProtectedPaths},
    cli::commands::auth::Options,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: SecretString,
    pub auth: Options,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let delegate = AuthDelegate::new(&args.auth.auth_url)?;
    let protected = ProtectedPaths::new(&args.auth.protected_prefix);

    let providers = args.auth.social_providers.clone();
    if providers.is_empty() {
        info!("No social providers configured; pages offer every provider");
    } else {
        let names: Vec<&str> = providers.iter().map(|p| p.as_str()).collect();
        info!("Social providers enabled: {}", names.join(", "));
    }

    debug!(
        "Trusted origins: {}",
        args.auth.trusted_origins().join(", ")
    );

    let pages = PageSettings::for_providers(providers);

    api::new(args.port, args.dsn, delegate, protected, pages).await
}
