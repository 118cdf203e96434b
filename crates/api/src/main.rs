use std::sync::Arc;

use anyhow::Context;

use tokengate_api::config::ServerConfig;
use tokengate_auth::{Argon2PasswordHasher, TokenService};
use tokengate_core::SystemClock;
use tokengate_infra::InMemoryPrincipalRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("loading configuration")?;
    tokengate_observability::init(config.log_format);

    let service = TokenService::new(
        Arc::new(InMemoryPrincipalRepository::new()),
        Arc::new(Argon2PasswordHasher::default()),
        &config.signing_key,
        Arc::new(SystemClock),
    );

    match &config.bootstrap_admin {
        Some(admin) => {
            service
                .bootstrap_admin(&admin.username, admin.email.as_deref(), &admin.password)
                .context("seeding bootstrap admin")?;
        }
        None => tracing::warn!("no bootstrap admin configured; registration is unreachable"),
    }

    let app = tokengate_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
