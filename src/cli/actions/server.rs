use crate::{
    auth::client::ExchangeClient,
    web::{self, guard::GuardConfig, AppState},
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend_url: String,
    pub identity_timeout: u64,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the backend URL is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let backend_url = Url::parse(&args.backend_url)
        .with_context(|| format!("Invalid backend URL: {}", args.backend_url))?;

    if backend_url.host_str().is_none() {
        anyhow::bail!("Backend URL must include a host: {}", args.backend_url);
    }

    debug!(
        backend = %backend_url,
        identity_timeout = args.identity_timeout,
        secure_cookies = args.secure_cookies,
        "server configuration"
    );

    let exchange = ExchangeClient::new(
        backend_url,
        Duration::from_secs(args.identity_timeout),
        args.secure_cookies,
    )?;

    let state = AppState {
        exchange: Arc::new(exchange),
        guard: GuardConfig::default(),
    };

    web::serve(args.port, state).await
}
