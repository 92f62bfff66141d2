//! The `quizgen serve` command.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::ModelArgs;

pub async fn execute(bind: Option<SocketAddr>, args: ModelArgs) -> Result<()> {
    let (config, service) = super::build_service(&args)?;
    let addr = bind.unwrap_or(config.bind);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    tracing::info!(
        %local,
        provider = service.provider_name(),
        model = %service.config().model,
        "listening"
    );
    eprintln!("quizgen listening on http://{local} (Ctrl-C to stop)");

    quizgen_http::serve(listener, Arc::new(service), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}
