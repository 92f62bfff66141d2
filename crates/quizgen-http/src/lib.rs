//! quizgen-http — JSON-over-HTTP endpoints.
//!
//! `POST /api/generate` and `POST /api/evaluate` wrap the two
//! [`QuizService`] handlers; `GET /health` reports liveness. Each connection
//! is served on its own task and shares only the immutable service.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use quizgen_core::QuizService;

pub mod response;
pub mod router;

pub use router::{handle, Route};

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Connections already in flight when `shutdown` fires are left to finish on
/// their own tasks.
pub async fn serve<F>(listener: TcpListener, service: Arc<QuizService>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    // Errors like EMFILE persist until a connection closes.
                    tracing::warn!("failed to accept connection: {e}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
            () = &mut shutdown => {
                tracing::info!("shutting down");
                return;
            }
        };

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let handler = service_fn(move |req| {
                let service = Arc::clone(&service);
                async move { Ok::<_, Infallible>(handle(req, &service).await) }
            });
            if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                tracing::debug!(%peer, "connection closed with error: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_failures_back_off() {
        assert!(ACCEPT_BACKOFF >= Duration::from_millis(10));
        assert!(ACCEPT_BACKOFF <= Duration::from_secs(1));
    }
}
